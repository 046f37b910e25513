//! Stand-ins for the browser so the session helper and permission gate can
//! run in a terminal

use std::io::{BufRead, Write};

use studygate_client_core::traits::{Navigator, PageView, UserPrompt};
use tracing::warn;

/// Asks on stdin, anything other than `y` or `yes` counts as declined
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if let Err(e) = std::io::stdout().flush() {
            warn!(?e, "failed to flush stdout");
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!(?e, "failed to read answer, treating as declined");
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        println!("{message}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Tells the user where to go instead of going there
#[derive(Debug)]
pub struct TerminalNavigator {
    server_address: String,
}

impl TerminalNavigator {
    pub fn new(server_address: String) -> Self {
        Self { server_address }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        println!(
            "Continue at {}{path}",
            self.server_address.trim_end_matches('/')
        );
    }

    fn reload(&self) {
        println!("Run the command again to see the change");
    }
}

/// Prints what would be shown on a page that has the elements in `element_ids`
///
/// It has no elements matching selectors so nothing is ever hidden and it has
/// nothing that can be clicked
#[derive(Debug)]
pub struct TerminalPage {
    element_ids: Vec<String>,
}

impl TerminalPage {
    pub fn new<I, S>(element_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            element_ids: element_ids.into_iter().map(Into::into).collect(),
        }
    }

    fn has_element(&self, element_id: &str) -> bool {
        self.element_ids.iter().any(|x| x == element_id)
    }
}

impl PageView for TerminalPage {
    fn hide_all(&self, selector: &str, disable: bool) -> usize {
        let action = if disable {
            "Not available (hidden and disabled)"
        } else {
            "Not available (hidden)"
        };
        println!("{action}: {selector}");
        0
    }

    fn set_text(&self, element_id: &str, text: &str) -> bool {
        if !self.has_element(element_id) {
            return false;
        }
        println!("{}: {text}", label(element_id));
        true
    }

    fn set_html(&self, element_id: &str, html: &str) -> bool {
        if !self.has_element(element_id) {
            return false;
        }
        println!("{}", html_to_text(html));
        true
    }

    fn on_click(&self, _element_id: &str, _handler: Box<dyn FnMut()>) -> bool {
        false
    }
}

/// `user-role` becomes `User role`
fn label(element_id: &str) -> String {
    let mut result = element_id.replace(['-', '_'], " ");
    if let Some(first) = result.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    result
}

/// Drops the tags and collapses the whitespace left behind. Buttons are
/// dropped with their label as they can not be activated from a terminal
fn html_to_text(html: &str) -> String {
    const BUTTON_END: &str = "</button>";
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        text.push(' ');
        let tag = &rest[start..];
        rest = if tag.starts_with("<button") {
            tag.find(BUTTON_END)
                .map_or("", |end| &tag[end + BUTTON_END.len()..])
        } else {
            tag.find('>').map_or("", |end| &tag[end + 1..])
        };
    }
    text.push_str(rest);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    html_escape::decode_html_entities(&collapsed).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("y", true)]
    #[case("YES\n", true)]
    #[case(" y \r\n", true)]
    #[case("", false)]
    #[case("n", false)]
    #[case("yep", false)]
    fn answers(#[case] answer: &str, #[case] expected: bool) {
        assert_eq!(is_yes(answer), expected);
    }

    #[rstest]
    #[case::welcome(
        r#"<span>Welcome, alice!</span><button id="user-info-logout" type="button">Logout</button>"#,
        "Welcome, alice!"
    )]
    #[case::login_link(r#"<a href="/login">Login</a>"#, "Login")]
    #[case::escaped(r#"<span>Welcome, &lt;b&gt;bob&amp;co!</span>"#, "Welcome, <b>bob&co!")]
    #[case::unclosed_button(r#"<span>Hi</span><button>Logout"#, "Hi")]
    fn rendered_html(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(html_to_text(html), expected);
    }

    #[rstest]
    #[case("user-role", "User role")]
    #[case("user-permissions", "User permissions")]
    #[case("", "")]
    fn labels(#[case] element_id: &str, #[case] expected: &str) {
        assert_eq!(label(element_id), expected);
    }

    #[test]
    fn nothing_hidden_or_clickable() {
        let page = TerminalPage::new(["user-info", "user-info-logout"]);
        assert_eq!(page.hide_all(".delete-btn", true), 0);
        assert!(!page.on_click("user-info-logout", Box::new(|| {})));
    }

    #[test]
    fn only_known_elements_are_written() {
        let page = TerminalPage::new(["user-role"]);
        assert!(page.set_text("user-role", "viewer"));
        assert!(!page.set_text("user-permissions", "READ"));
        assert!(!page.set_html("user-info", "<a>Login</a>"));
    }
}

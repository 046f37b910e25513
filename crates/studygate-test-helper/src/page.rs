use std::{cell::RefCell, collections::HashMap};

use studygate_client_core::traits::PageView;

/// Minimal stand in for an element of the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeElement {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub is_hidden: bool,
    pub is_disabled: bool,
    pub text: Option<String>,
    pub html: Option<String>,
}

/// Page made of [`FakeElement`]s. Supports selector lists made of `.class`,
/// `#id` and `[name="value"]` selectors which is all the client modules use
#[derive(Default)]
pub struct FakePage {
    elements: RefCell<Vec<FakeElement>>,
    click_handlers: RefCell<HashMap<String, Box<dyn FnMut()>>>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: &str) -> Self {
        Self::new().id(id)
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    fn matches_simple(&self, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|x| x == class)
        } else if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else if let Some(inner) = selector
            .strip_prefix('[')
            .and_then(|x| x.strip_suffix(']'))
        {
            let Some((name, value)) = inner.split_once('=') else {
                return self.attributes.iter().any(|(x, _)| x == inner);
            };
            let value = value.trim_matches('"');
            self.attributes.iter().any(|(x, y)| x == name && y == value)
        } else {
            panic!("selector not supported by the fake page: {selector:?}")
        }
    }

    pub fn matches(&self, selector_list: &str) -> bool {
        selector_list
            .split(',')
            .map(str::trim)
            .any(|selector| self.matches_simple(selector))
    }
}

impl std::fmt::Debug for FakePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakePage")
            .field("elements", &self.elements.borrow())
            .field(
                "click_handlers",
                &self.click_handlers.borrow().keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(self, element: FakeElement) -> Self {
        self.elements.borrow_mut().push(element);
        self
    }

    /// Page with every element the permission gate and session helper touch
    pub fn full() -> Self {
        Self::new()
            .with_element(FakeElement::new().class("delete-btn"))
            .with_element(FakeElement::new().attr("data-action", "delete"))
            .with_element(FakeElement::new().class("admin-only"))
            .with_element(FakeElement::new().class("study-row"))
            .with_element(FakeElement::with_id("user-role"))
            .with_element(FakeElement::with_id("user-permissions"))
            .with_element(FakeElement::with_id("user-info"))
    }

    pub fn elements(&self) -> Vec<FakeElement> {
        self.elements.borrow().clone()
    }

    pub fn matching(&self, selector: &str) -> Vec<FakeElement> {
        self.elements
            .borrow()
            .iter()
            .filter(|x| x.matches(selector))
            .cloned()
            .collect()
    }

    pub fn element(&self, id: &str) -> Option<FakeElement> {
        self.elements
            .borrow()
            .iter()
            .find(|x| x.id.as_deref() == Some(id))
            .cloned()
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.element(id).and_then(|x| x.text)
    }

    pub fn html_of(&self, id: &str) -> Option<String> {
        self.element(id).and_then(|x| x.html)
    }

    /// Runs the click handler bound to the element. Returns `false` if none
    /// was bound
    pub fn click(&self, id: &str) -> bool {
        let handler = self.click_handlers.borrow_mut().remove(id);
        match handler {
            Some(mut handler) => {
                handler();
                self.click_handlers
                    .borrow_mut()
                    .insert(id.to_string(), handler);
                true
            }
            None => false,
        }
    }

    fn with_element_by_id<F: FnOnce(&mut FakeElement)>(&self, id: &str, f: F) -> bool {
        let mut elements = self.elements.borrow_mut();
        match elements.iter_mut().find(|x| x.id.as_deref() == Some(id)) {
            Some(element) => {
                f(element);
                true
            }
            None => false,
        }
    }
}

impl PageView for FakePage {
    fn hide_all(&self, selector: &str, disable: bool) -> usize {
        let mut count = 0;
        for element in self
            .elements
            .borrow_mut()
            .iter_mut()
            .filter(|x| x.matches(selector))
        {
            element.is_hidden = true;
            if disable {
                element.is_disabled = true;
            }
            count += 1;
        }
        count
    }

    fn set_text(&self, element_id: &str, text: &str) -> bool {
        self.with_element_by_id(element_id, |element| element.text = Some(text.to_string()))
    }

    fn set_html(&self, element_id: &str, html: &str) -> bool {
        let is_found =
            self.with_element_by_id(element_id, |element| element.html = Some(html.to_string()));
        if is_found {
            // Mimic the browser by making elements with an id in the markup findable
            for id in ids_in_markup(html) {
                if self.element(&id).is_none() {
                    self.elements
                        .borrow_mut()
                        .push(FakeElement::with_id(&id));
                }
            }
        }
        is_found
    }

    fn on_click(&self, element_id: &str, handler: Box<dyn FnMut()>) -> bool {
        if self.element(element_id).is_none() {
            return false;
        }
        self.click_handlers
            .borrow_mut()
            .insert(element_id.to_string(), handler);
        true
    }
}

fn ids_in_markup(html: &str) -> Vec<String> {
    html.split(r#"id=""#)
        .skip(1)
        .filter_map(|rest| rest.split_once('"').map(|(id, _)| id.to_string()))
        .collect()
}

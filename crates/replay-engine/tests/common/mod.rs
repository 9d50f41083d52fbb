#![allow(dead_code)]

use async_trait::async_trait;
use replay_engine::backend::{
    Backend, BackendError, ElementHandle, HighlightStyle, NavigationResult,
};
use replay_engine::selector::Selector;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub value: String,
    pub clicks: usize,
    pub focused: bool,
    pub input_events: usize,
    pub highlights: usize,
}

/// In-memory page. Selectors are keyed by their normalised `kind=value` form.
#[derive(Debug, Default)]
pub struct FakePage {
    pub url: String,
    selectors: HashMap<String, u64>,
    misses_left: HashMap<String, usize>,
    invalid: HashSet<String>,
    pub elements: HashMap<u64, FakeElement>,
    pub queries: Vec<String>,
    pub navigations: Vec<String>,
    pub keys: Vec<String>,
    pub fail_clicks: bool,
    next_handle: u64,
}

fn key(selector: &str) -> String {
    Selector::parse(selector).to_string()
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_element(self, selector: &str) -> Self {
        self.with_late_element(selector, 0)
    }

    /// The element only shows up after `misses` unsuccessful queries.
    pub fn with_late_element(mut self, selector: &str, misses: usize) -> Self {
        self.next_handle += 1;
        let handle = self.next_handle;
        self.selectors.insert(key(selector), handle);
        self.misses_left.insert(key(selector), misses);
        self.elements.insert(handle, FakeElement::default());
        self
    }

    pub fn with_invalid(mut self, selector: &str) -> Self {
        self.invalid.insert(key(selector));
        self
    }

    pub fn element(&self, selector: &str) -> &FakeElement {
        let handle = self.selectors[&key(selector)];
        &self.elements[&handle]
    }

    pub fn query_count(&self, selector: &str) -> usize {
        let k = key(selector);
        self.queries.iter().filter(|q| **q == k).count()
    }

    fn element_mut(&mut self, element: ElementHandle) -> Result<&mut FakeElement, BackendError> {
        self.elements
            .get_mut(&element.0)
            .ok_or(BackendError::StaleElement(element))
    }
}

#[async_trait]
impl Backend for FakePage {
    async fn launch(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
    async fn is_ready(&self) -> bool {
        true
    }

    async fn current_url(&mut self) -> Result<String, BackendError> {
        Ok(self.url.clone())
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.navigations.push(url.to_string());
        self.url = url.to_string();
        Ok(NavigationResult {
            url: url.to_string(),
            title: "Fake".into(),
            status: 200,
        })
    }

    async fn query(&mut self, selector: &Selector) -> Result<Option<ElementHandle>, BackendError> {
        let k = selector.to_string();
        self.queries.push(k.clone());

        if self.invalid.contains(&k) {
            return Err(BackendError::InvalidSelector(k));
        }
        let Some(&handle) = self.selectors.get(&k) else {
            return Ok(None);
        };
        if let Some(misses) = self.misses_left.get_mut(&k)
            && *misses > 0
        {
            *misses -= 1;
            return Ok(None);
        }
        Ok(Some(ElementHandle(handle)))
    }

    async fn click(&mut self, element: ElementHandle) -> Result<(), BackendError> {
        if self.fail_clicks {
            return Err(BackendError::Script("element is not clickable".into()));
        }
        self.element_mut(element)?.clicks += 1;
        Ok(())
    }

    async fn focus(&mut self, element: ElementHandle) -> Result<(), BackendError> {
        self.element_mut(element)?.focused = true;
        Ok(())
    }

    async fn set_value(&mut self, element: ElementHandle, value: &str) -> Result<(), BackendError> {
        let el = self.element_mut(element)?;
        el.value = value.to_string();
        el.input_events += 1;
        Ok(())
    }

    async fn dispatch_key(&mut self, key: &str) -> Result<(), BackendError> {
        self.keys.push(key.to_string());
        Ok(())
    }

    async fn highlight(
        &mut self,
        element: ElementHandle,
        _style: &HighlightStyle,
    ) -> Result<(), BackendError> {
        self.element_mut(element)?.highlights += 1;
        Ok(())
    }
}

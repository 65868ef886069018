//! Breadcrumb trail shown above each page.

use serde::{Deserialize, Serialize};

use super::Slice;

/// One step of the trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Crumb {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            icon: None,
            label: label.into(),
            path: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreadcrumbAction {
    /// Replace the whole trail.
    Set(Vec<Crumb>),
    Push(Crumb),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreadcrumbSlice {
    pub items: Vec<Crumb>,
}

impl BreadcrumbSlice {
    /// The last crumb, i.e. the current page.
    pub fn current(&self) -> Option<&Crumb> {
        self.items.last()
    }
}

impl Slice for BreadcrumbSlice {
    type Action = BreadcrumbAction;

    fn reduce(&mut self, action: BreadcrumbAction) {
        match action {
            BreadcrumbAction::Set(items) => self.items = items,
            BreadcrumbAction::Push(crumb) => self.items.push(crumb),
            BreadcrumbAction::Clear => self.items.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_trail() {
        let mut slice = BreadcrumbSlice::default();
        slice.reduce(BreadcrumbAction::Push(Crumb::new("Old")));
        slice.reduce(BreadcrumbAction::Set(vec![
            Crumb::new("Schools").with_path("/school"),
            Crumb::new("Detail").with_icon("school"),
        ]));
        assert_eq!(slice.items.len(), 2);
        assert_eq!(slice.items[0].path.as_deref(), Some("/school"));
        assert_eq!(slice.current().unwrap().label, "Detail");
    }

    #[test]
    fn test_push_and_clear() {
        let mut slice = BreadcrumbSlice::default();
        slice.reduce(BreadcrumbAction::Push(Crumb::new("Users")));
        slice.reduce(BreadcrumbAction::Push(Crumb::new("Scores")));
        assert_eq!(slice.current().unwrap().label, "Scores");
        slice.reduce(BreadcrumbAction::Clear);
        assert!(slice.current().is_none());
    }

    #[test]
    fn test_crumb_json_omits_missing_fields() {
        let json = serde_json::to_value(Crumb::new("Home")).unwrap();
        assert_eq!(json, serde_json::json!({"label": "Home"}));
    }
}

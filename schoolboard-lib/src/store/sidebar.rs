//! Sidebar open/closed state.

use super::Slice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    Toggle,
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidebarSlice {
    pub open: bool,
}

impl Slice for SidebarSlice {
    type Action = SidebarAction;

    fn reduce(&mut self, action: SidebarAction) {
        self.open = match action {
            SidebarAction::Toggle => !self.open,
            SidebarAction::Open => true,
            SidebarAction::Close => false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions() {
        let mut slice = SidebarSlice::default();
        slice.reduce(SidebarAction::Toggle);
        assert!(slice.open);
        slice.reduce(SidebarAction::Open);
        assert!(slice.open);
        slice.reduce(SidebarAction::Toggle);
        assert!(!slice.open);
        slice.reduce(SidebarAction::Close);
        assert!(!slice.open);
    }
}

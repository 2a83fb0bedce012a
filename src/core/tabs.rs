//! Sidebar tab sets and tab resolution
//!
//! Each info panel kind exposes a fixed set of tabs. The selected tab
//! is stored in the `st` query parameter as a lowercase wire string and
//! is interpreted against whichever panel is open: a value that names a
//! tab the current panel does not have silently resolves to that
//! panel's default instead of erroring, so stale links stay usable.

use crate::core::panel::PanelKind;

/// All tabs any sidebar panel can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTab {
    Preview,
    Manage,
    Details,
    Usage,
    Settings,
}

/// Tabs of the component info panel, in display order
pub const COMPONENT_TABS: &[SidebarTab] = &[
    SidebarTab::Preview,
    SidebarTab::Manage,
    SidebarTab::Details,
];

/// Tabs of the unit info panel, in display order
pub const UNIT_TABS: &[SidebarTab] = &[
    SidebarTab::Preview,
    SidebarTab::Manage,
    SidebarTab::Usage,
    SidebarTab::Settings,
];

/// Tabs of the collection info panel, in display order
pub const COLLECTION_TABS: &[SidebarTab] = &[SidebarTab::Manage, SidebarTab::Details];

impl SidebarTab {
    /// Wire string used in the `st` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SidebarTab::Preview => "preview",
            SidebarTab::Manage => "manage",
            SidebarTab::Details => "details",
            SidebarTab::Usage => "usage",
            SidebarTab::Settings => "settings",
        }
    }

    /// Parse the wire string. Unknown values decode to `None`.
    pub fn parse(s: &str) -> Option<SidebarTab> {
        match s {
            "preview" => Some(SidebarTab::Preview),
            "manage" => Some(SidebarTab::Manage),
            "details" => Some(SidebarTab::Details),
            "usage" => Some(SidebarTab::Usage),
            "settings" => Some(SidebarTab::Settings),
            _ => None,
        }
    }

    /// Label shown in the tab bar.
    pub fn label(&self) -> &'static str {
        match self {
            SidebarTab::Preview => "Preview",
            SidebarTab::Manage => "Manage",
            SidebarTab::Details => "Details",
            SidebarTab::Usage => "Usage",
            SidebarTab::Settings => "Settings",
        }
    }
}

/// Tabs a panel of the given kind exposes. Empty for panels without a
/// tab bar.
pub fn tabs_for(kind: PanelKind) -> &'static [SidebarTab] {
    match kind {
        PanelKind::ComponentInfo => COMPONENT_TABS,
        PanelKind::UnitInfo | PanelKind::SectionInfo | PanelKind::SubsectionInfo => UNIT_TABS,
        PanelKind::CollectionInfo => COLLECTION_TABS,
        PanelKind::Closed | PanelKind::AddContent | PanelKind::LibraryInfo => &[],
    }
}

/// Per-panel-kind default tabs, overridable from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTabs {
    pub component: SidebarTab,
    pub unit: SidebarTab,
    pub collection: SidebarTab,
}

impl Default for DefaultTabs {
    fn default() -> Self {
        DefaultTabs {
            component: SidebarTab::Preview,
            unit: SidebarTab::Preview,
            collection: SidebarTab::Manage,
        }
    }
}

impl DefaultTabs {
    /// Default tab for a panel kind, `None` for panels without tabs.
    pub fn for_kind(&self, kind: PanelKind) -> Option<SidebarTab> {
        match kind {
            PanelKind::ComponentInfo => Some(self.component),
            PanelKind::UnitInfo | PanelKind::SectionInfo | PanelKind::SubsectionInfo => {
                Some(self.unit)
            }
            PanelKind::CollectionInfo => Some(self.collection),
            PanelKind::Closed | PanelKind::AddContent | PanelKind::LibraryInfo => None,
        }
    }
}

/// Resolve a requested tab against a panel kind.
///
/// Returns the requested tab when the panel has it and it is not in
/// `hidden`, otherwise the kind's default. `None` only for panel kinds
/// without a tab bar. The fallback is silent; a link asking a
/// collection panel for its (nonexistent) `preview` tab simply lands on
/// the collection default. A hidden default skips to the first visible
/// tab, and when every tab is hidden the default wins after all.
pub fn resolve_tab(
    defaults: &DefaultTabs,
    kind: PanelKind,
    requested: Option<SidebarTab>,
    hidden: &[SidebarTab],
) -> Option<SidebarTab> {
    let legal = tabs_for(kind);
    if legal.is_empty() {
        return None;
    }
    if let Some(tab) = requested {
        if legal.contains(&tab) && !hidden.contains(&tab) {
            return Some(tab);
        }
    }
    let default = defaults.for_kind(kind)?;
    if hidden.contains(&default) {
        if let Some(tab) = legal.iter().find(|t| !hidden.contains(t)) {
            return Some(*tab);
        }
    }
    Some(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_round_trip() {
        for tab in [
            SidebarTab::Preview,
            SidebarTab::Manage,
            SidebarTab::Details,
            SidebarTab::Usage,
            SidebarTab::Settings,
        ] {
            assert_eq!(SidebarTab::parse(tab.as_str()), Some(tab));
        }
        assert_eq!(SidebarTab::parse("Preview"), None);
        assert_eq!(SidebarTab::parse(""), None);
    }

    #[test]
    fn test_tab_sets() {
        assert_eq!(tabs_for(PanelKind::ComponentInfo).len(), 3);
        assert_eq!(tabs_for(PanelKind::UnitInfo).len(), 4);
        assert_eq!(tabs_for(PanelKind::CollectionInfo).len(), 2);
        assert!(tabs_for(PanelKind::LibraryInfo).is_empty());
        assert!(tabs_for(PanelKind::Closed).is_empty());
    }

    #[test]
    fn test_default_tabs() {
        let defaults = DefaultTabs::default();
        assert_eq!(
            defaults.for_kind(PanelKind::ComponentInfo),
            Some(SidebarTab::Preview)
        );
        assert_eq!(
            defaults.for_kind(PanelKind::CollectionInfo),
            Some(SidebarTab::Manage)
        );
        assert_eq!(defaults.for_kind(PanelKind::AddContent), None);
    }

    #[test]
    fn test_resolve_legal_request() {
        let defaults = DefaultTabs::default();
        assert_eq!(
            resolve_tab(
                &defaults,
                PanelKind::ComponentInfo,
                Some(SidebarTab::Manage),
                &[]
            ),
            Some(SidebarTab::Manage)
        );
    }

    #[test]
    fn test_resolve_illegal_request_falls_back() {
        let defaults = DefaultTabs::default();
        // Collections have no preview tab
        assert_eq!(
            resolve_tab(
                &defaults,
                PanelKind::CollectionInfo,
                Some(SidebarTab::Preview),
                &[]
            ),
            Some(SidebarTab::Manage)
        );
        // Components have no usage tab
        assert_eq!(
            resolve_tab(
                &defaults,
                PanelKind::ComponentInfo,
                Some(SidebarTab::Usage),
                &[]
            ),
            Some(SidebarTab::Preview)
        );
    }

    #[test]
    fn test_resolve_missing_request_uses_default() {
        let defaults = DefaultTabs::default();
        assert_eq!(
            resolve_tab(&defaults, PanelKind::UnitInfo, None, &[]),
            Some(SidebarTab::Preview)
        );
    }

    #[test]
    fn test_resolve_hidden_tab_falls_back() {
        let defaults = DefaultTabs::default();
        assert_eq!(
            resolve_tab(
                &defaults,
                PanelKind::ComponentInfo,
                Some(SidebarTab::Manage),
                &[SidebarTab::Manage, SidebarTab::Details]
            ),
            Some(SidebarTab::Preview)
        );
    }

    #[test]
    fn test_resolve_hidden_default_skips_to_visible() {
        let defaults = DefaultTabs::default();
        // Collection default is Manage; with Manage hidden the first
        // visible tab wins
        assert_eq!(
            resolve_tab(
                &defaults,
                PanelKind::CollectionInfo,
                None,
                &[SidebarTab::Manage]
            ),
            Some(SidebarTab::Details)
        );
        // Everything hidden still resolves to the default
        assert_eq!(
            resolve_tab(
                &defaults,
                PanelKind::CollectionInfo,
                None,
                &[SidebarTab::Manage, SidebarTab::Details]
            ),
            Some(SidebarTab::Manage)
        );
    }

    #[test]
    fn test_resolve_tabless_kind() {
        let defaults = DefaultTabs::default();
        assert_eq!(
            resolve_tab(&defaults, PanelKind::LibraryInfo, Some(SidebarTab::Manage), &[]),
            None
        );
    }

    #[test]
    fn test_section_kinds_share_unit_tabs() {
        assert_eq!(tabs_for(PanelKind::SectionInfo), UNIT_TABS);
        assert_eq!(tabs_for(PanelKind::SubsectionInfo), UNIT_TABS);
    }
}

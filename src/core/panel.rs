//! Sidebar panel and pending action definitions

use crate::key::EntityKind;

/// Which sidebar body is currently showing, with the entity it is about
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SidebarPanel {
    /// No sidebar is open
    #[default]
    Closed,

    /// The add-content picker
    AddContent,

    /// Info about the library as a whole
    LibraryInfo,

    /// Info about a single content block
    ComponentInfo { usage_key: String },

    /// Info about a collection
    CollectionInfo { collection_key: String },

    /// Info about a unit container
    UnitInfo { container_key: String },

    /// Info about a section container (not yet surfaced in any route)
    SectionInfo { container_key: String },

    /// Info about a subsection container (not yet surfaced in any route)
    SubsectionInfo { container_key: String },
}

impl SidebarPanel {
    /// The payload-free kind of this panel.
    pub fn kind(&self) -> PanelKind {
        match self {
            SidebarPanel::Closed => PanelKind::Closed,
            SidebarPanel::AddContent => PanelKind::AddContent,
            SidebarPanel::LibraryInfo => PanelKind::LibraryInfo,
            SidebarPanel::ComponentInfo { .. } => PanelKind::ComponentInfo,
            SidebarPanel::CollectionInfo { .. } => PanelKind::CollectionInfo,
            SidebarPanel::UnitInfo { .. } => PanelKind::UnitInfo,
            SidebarPanel::SectionInfo { .. } => PanelKind::SectionInfo,
            SidebarPanel::SubsectionInfo { .. } => PanelKind::SubsectionInfo,
        }
    }

    /// Id of the entity this panel is about, if it is about one.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            SidebarPanel::Closed | SidebarPanel::AddContent | SidebarPanel::LibraryInfo => None,
            SidebarPanel::ComponentInfo { usage_key } => Some(usage_key),
            SidebarPanel::CollectionInfo { collection_key } => Some(collection_key),
            SidebarPanel::UnitInfo { container_key }
            | SidebarPanel::SectionInfo { container_key }
            | SidebarPanel::SubsectionInfo { container_key } => Some(container_key),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, SidebarPanel::Closed)
    }

    /// Panel that shows info for an entity of the given kind.
    pub fn for_entity(kind: EntityKind, id: &str) -> SidebarPanel {
        let id = id.to_string();
        match kind {
            EntityKind::Component => SidebarPanel::ComponentInfo { usage_key: id },
            EntityKind::Collection => SidebarPanel::CollectionInfo { collection_key: id },
            EntityKind::Unit => SidebarPanel::UnitInfo { container_key: id },
            EntityKind::Section => SidebarPanel::SectionInfo { container_key: id },
            EntityKind::Subsection => SidebarPanel::SubsectionInfo { container_key: id },
        }
    }
}

/// Panel kind without its payload, for tab scoping and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Closed,
    AddContent,
    LibraryInfo,
    ComponentInfo,
    CollectionInfo,
    UnitInfo,
    SectionInfo,
    SubsectionInfo,
}

impl PanelKind {
    /// Stable kebab-case name, used in state dumps.
    pub fn wire_name(&self) -> &'static str {
        match self {
            PanelKind::Closed => "closed",
            PanelKind::AddContent => "add-content",
            PanelKind::LibraryInfo => "info",
            PanelKind::ComponentInfo => "component-info",
            PanelKind::CollectionInfo => "collection-info",
            PanelKind::UnitInfo => "unit-info",
            PanelKind::SectionInfo => "section-info",
            PanelKind::SubsectionInfo => "subsection-info",
        }
    }

    /// Title shown in the sidebar header.
    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Closed => "",
            PanelKind::AddContent => "Add Content",
            PanelKind::LibraryInfo => "Library Info",
            PanelKind::ComponentInfo => "Component Info",
            PanelKind::CollectionInfo => "Collection Info",
            PanelKind::UnitInfo => "Unit Info",
            PanelKind::SectionInfo => "Section Info",
            PanelKind::SubsectionInfo => "Subsection Info",
        }
    }

    /// Entity kind whose metadata this panel shows, if any.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            PanelKind::ComponentInfo => Some(EntityKind::Component),
            PanelKind::CollectionInfo => Some(EntityKind::Collection),
            PanelKind::UnitInfo => Some(EntityKind::Unit),
            PanelKind::SectionInfo => Some(EntityKind::Section),
            PanelKind::SubsectionInfo => Some(EntityKind::Subsection),
            _ => None,
        }
    }
}

/// One-shot instruction for the next panel that can handle it.
///
/// Set alongside an open call, carried in the `sa` query parameter, and
/// consumed exactly once by a panel that supports it. A panel that
/// cannot handle the pending action leaves it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarAction {
    #[default]
    None,
    JumpToManageCollections,
    JumpToManageTags,
    ManageTeam,
}

impl SidebarAction {
    /// Wire string used in the `sa` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SidebarAction::None => "",
            SidebarAction::JumpToManageCollections => "jump-to-manage-collections",
            SidebarAction::JumpToManageTags => "jump-to-manage-tags",
            SidebarAction::ManageTeam => "manage-team",
        }
    }

    /// Parse the wire string. Unknown values decode to `None` so stale
    /// or hand-edited links degrade to "no pending action".
    pub fn parse(s: &str) -> Option<SidebarAction> {
        match s {
            "" => Some(SidebarAction::None),
            "jump-to-manage-collections" => Some(SidebarAction::JumpToManageCollections),
            "jump-to-manage-tags" => Some(SidebarAction::JumpToManageTags),
            "manage-team" => Some(SidebarAction::ManageTeam),
            _ => None,
        }
    }

    /// Whether a panel of the given kind can consume this action.
    pub fn applies_to(&self, kind: PanelKind) -> bool {
        match self {
            SidebarAction::None => false,
            SidebarAction::JumpToManageCollections | SidebarAction::JumpToManageTags => {
                matches!(
                    kind,
                    PanelKind::ComponentInfo
                        | PanelKind::UnitInfo
                        | PanelKind::SectionInfo
                        | PanelKind::SubsectionInfo
                )
            }
            SidebarAction::ManageTeam => matches!(kind, PanelKind::LibraryInfo),
        }
    }

    /// Panel body section this action jumps to once consumed.
    pub fn section(&self) -> Option<PanelSection> {
        match self {
            SidebarAction::None => None,
            SidebarAction::JumpToManageCollections => Some(PanelSection::Collections),
            SidebarAction::JumpToManageTags => Some(PanelSection::Tags),
            SidebarAction::ManageTeam => Some(PanelSection::Team),
        }
    }
}

/// A highlightable section inside a panel body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSection {
    Collections,
    Tags,
    Team,
}

impl PanelSection {
    pub fn label(&self) -> &'static str {
        match self {
            PanelSection::Collections => "Collections",
            PanelSection::Tags => "Tags",
            PanelSection::Team => "Team",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_kind_and_target() {
        let panel = SidebarPanel::ComponentInfo {
            usage_key: "lb:a:b:html:x".to_string(),
        };
        assert_eq!(panel.kind(), PanelKind::ComponentInfo);
        assert_eq!(panel.target_id(), Some("lb:a:b:html:x"));
        assert!(panel.is_open());

        assert_eq!(SidebarPanel::Closed.kind(), PanelKind::Closed);
        assert_eq!(SidebarPanel::Closed.target_id(), None);
        assert!(!SidebarPanel::Closed.is_open());
        assert_eq!(SidebarPanel::AddContent.target_id(), None);
    }

    #[test]
    fn test_panel_for_entity() {
        let panel = SidebarPanel::for_entity(EntityKind::Unit, "lct:a:b:unit:u1");
        assert_eq!(panel.kind(), PanelKind::UnitInfo);
        assert_eq!(panel.target_id(), Some("lct:a:b:unit:u1"));

        let panel = SidebarPanel::for_entity(EntityKind::Collection, "coll-1");
        assert_eq!(panel.kind(), PanelKind::CollectionInfo);
    }

    #[test]
    fn test_default_panel_is_closed() {
        assert_eq!(SidebarPanel::default(), SidebarPanel::Closed);
    }

    #[test]
    fn test_panel_wire_names() {
        assert_eq!(PanelKind::LibraryInfo.wire_name(), "info");
        assert_eq!(PanelKind::ComponentInfo.wire_name(), "component-info");
        assert_eq!(PanelKind::AddContent.wire_name(), "add-content");
        assert_eq!(PanelKind::Closed.wire_name(), "closed");
    }

    #[test]
    fn test_action_wire_strings() {
        assert_eq!(SidebarAction::JumpToManageTags.as_str(), "jump-to-manage-tags");
        assert_eq!(
            SidebarAction::parse("jump-to-manage-collections"),
            Some(SidebarAction::JumpToManageCollections)
        );
        assert_eq!(SidebarAction::parse(""), Some(SidebarAction::None));
        assert_eq!(SidebarAction::parse("bogus"), None);
    }

    #[test]
    fn test_action_applicability() {
        assert!(SidebarAction::ManageTeam.applies_to(PanelKind::LibraryInfo));
        assert!(!SidebarAction::ManageTeam.applies_to(PanelKind::ComponentInfo));
        assert!(SidebarAction::JumpToManageTags.applies_to(PanelKind::ComponentInfo));
        assert!(SidebarAction::JumpToManageTags.applies_to(PanelKind::UnitInfo));
        assert!(SidebarAction::JumpToManageTags.applies_to(PanelKind::SectionInfo));
        assert!(!SidebarAction::JumpToManageTags.applies_to(PanelKind::CollectionInfo));
        assert!(!SidebarAction::None.applies_to(PanelKind::LibraryInfo));
    }

    #[test]
    fn test_action_sections() {
        assert_eq!(
            SidebarAction::JumpToManageTags.section(),
            Some(PanelSection::Tags)
        );
        assert_eq!(SidebarAction::ManageTeam.section(), Some(PanelSection::Team));
        assert_eq!(SidebarAction::None.section(), None);
    }

    #[test]
    fn test_entity_kind_mapping() {
        assert_eq!(
            PanelKind::ComponentInfo.entity_kind(),
            Some(EntityKind::Component)
        );
        assert_eq!(PanelKind::AddContent.entity_kind(), None);
    }
}

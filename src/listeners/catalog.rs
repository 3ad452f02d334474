//! Public lifecycle event catalog
//!
//! The events the host emits to plugins. Plugins may also define their own
//! event names; the registry accepts any name, this enum only names the
//! documented ones. Every event whose name starts with `before` can be
//! stopped by a listener returning `false`.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

const VETOABLE_PREFIX: &str = "before";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum LifecycleEvent {
    BeforeSave,
    AfterSave,
    BeforeCreate,
    AfterCreate,
    BeforeLoad,
    AfterLoad,
    BeforeDelete,
    AfterDelete,
    BeforePublish,
    AfterPublish,
    BeforePreview,
    ModifiedContent,
    AddTag,
    AddCategory,
    EditorFocus,
    EditorUnfocus,
    EditorsLostFocus,
    EditorReady,
    ReceivedFocus,
    AppPaneMaximized,
    AppPaneRestored,
    AppAuthenticated,
    ChangedCustomMeta,
    ElementRemoved,
    PluginElementClicked,
    PluginElementSelected,
    PluginElementDeselected,
}

impl LifecycleEvent {
    /// Wire name, e.g. `beforeSave`
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn is_vetoable(self) -> bool {
        is_vetoable_event(self.name())
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::BeforeSave => "before an article is saved",
            Self::AfterSave => "after an article has been saved",
            Self::BeforeCreate => "before a new article is created",
            Self::AfterCreate => "after a new article has been created",
            Self::BeforeLoad => "before an article is loaded into the editor",
            Self::AfterLoad => "after an article has been loaded",
            Self::BeforeDelete => "before an article is deleted",
            Self::AfterDelete => "after an article has been deleted",
            Self::BeforePublish => "before an article is published",
            Self::AfterPublish => "after an article has been published",
            Self::BeforePreview => "before the article is opened in the preview",
            Self::ModifiedContent => "whenever content changes in the article",
            Self::AddTag => "after a tag has been added to the article",
            Self::AddCategory => "after a category has been added to the article",
            Self::EditorFocus => "when an editor gets focus",
            Self::EditorUnfocus => "when an editor loses focus",
            Self::EditorsLostFocus => "when all editors lose focus",
            Self::EditorReady => "when the editor is fully loaded and ready for input",
            Self::ReceivedFocus => {
                "when a plugin receives focus; carries previousPluginName and givenFocus"
            }
            Self::AppPaneMaximized => "when the app pane is maximized",
            Self::AppPaneRestored => "when the app pane is restored to its original size",
            Self::AppAuthenticated => "when an app has been authenticated",
            Self::ChangedCustomMeta => "when a custom meta property is set; carries name and value",
            Self::ElementRemoved => "when an element of the current plugin is removed; carries its id",
            Self::PluginElementClicked => "when a plugin element in the editor is clicked",
            Self::PluginElementSelected => "when a plugin element in the editor is selected",
            Self::PluginElementDeselected => "when a plugin element in the editor is deselected",
        }
    }
}

/// Whether listeners of `event` may stop the pending action.
/// Applies to custom plugin events as well as the catalog.
pub fn is_vetoable_event(event: &str) -> bool {
    event.starts_with(VETOABLE_PREFIX)
}

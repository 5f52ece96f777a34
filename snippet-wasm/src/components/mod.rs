pub(crate) mod auth_panel;
pub(crate) mod pagination_panel;
pub(crate) mod search_panel;
pub(crate) mod snippets_panel;

pub(crate) mod component;
pub(crate) mod evaluate;
pub(crate) mod layout;
pub(crate) mod text;

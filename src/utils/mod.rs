pub(crate) mod compare;
pub(crate) mod time;

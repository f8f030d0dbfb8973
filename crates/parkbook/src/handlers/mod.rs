pub(crate) mod form;
pub(crate) mod login;
pub(crate) mod submit;
pub(crate) mod tab;
pub(crate) mod verify;

pub(crate) use tab::BookingTab;

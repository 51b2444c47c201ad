pub mod likes;
pub mod notifications;
pub mod ports;
pub mod rsvp;

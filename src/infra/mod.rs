pub mod in_memory;
pub mod nominatim;
pub mod resend;
pub mod sanity;

pub use in_memory::InMemoryContentStore;
pub use nominatim::NominatimGeocoder;
pub use resend::ResendMailer;
pub use sanity::SanityClient;

pub mod fs;
pub mod net;
pub mod logger;

pub use fs::FileUtils;
pub use logger::Logger;
pub use net::{HttpFetch, HttpResponse, HttpSession};

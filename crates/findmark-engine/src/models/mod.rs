pub mod page;
pub mod site_map;

pub use page::Page;
pub use site_map::SiteMap;

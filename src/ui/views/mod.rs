mod resource_detail;
mod resource_list;

pub use resource_detail::ResourceDetailView;
pub use resource_list::ResourceListView;

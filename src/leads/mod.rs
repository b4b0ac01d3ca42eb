pub mod category;
pub mod filter;
pub mod mutation;
pub mod sample;
pub mod storage;
pub mod types;

pub use category::{
    Budget, CompanySize, ParseCategoryError, ProjectType, Source, Status, Timeline,
};
pub use filter::{filter_and_sort, filter_and_sort_indices, LeadQuery, PriorityFilter, StatusFilter};
pub use mutation::{add_lead, change_status, find_lead, update_notes, LeadError};
pub use sample::sample_leads;
pub use storage::{
    backup_path, get_leads_path, load_leads, load_leads_with_state, open_leads, save_leads,
    StoreState, LEADS_FILE,
};
pub use types::{create_lead, Lead, NewLead};

pub mod entry;
pub mod reference_list;

pub mod add;
pub mod conflicts;
pub mod delete;
pub mod edit;
pub mod list;
pub mod remind;
pub mod search;
pub mod show;
pub mod stats;

pub mod blockers;
pub mod doctor;
pub mod export;
pub mod lint;
pub mod load;
pub mod next;
pub mod topo;
pub mod validate;

//! Wire models shared by the CRM backend and the dashboard frontend.

pub mod model;
pub mod responses;

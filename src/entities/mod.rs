pub mod event;
pub mod news;
pub mod team_member;

pub use event::{Event, EventStatus};
pub use news::News;
pub use team_member::TeamMember;

use crate::schema::Schema;

pub const SCHEMAS: [Schema; 3] = [event::SCHEMA, news::SCHEMA, team_member::SCHEMA];

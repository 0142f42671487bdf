// http://activitystrea.ms/specs/json/1.0/

mod activity;
mod actor;
mod kinds;
mod list;
mod location;
mod media;
mod object;
mod tag;

pub use activity::{Activity, Context};
pub use actor::{merge_urls, Actor};
pub use kinds::{ObjectType, Verb};
pub use list::OneOrList;
pub use location::{iso_6709, Location};
pub use media::{Audience, Image, Ref, UrlValue, PRIVATE_ALIAS, PUBLIC_ALIAS};
pub use object::{Attachment, Object, Replies};
pub use tag::Tag;

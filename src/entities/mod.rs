//! Domain entities and the mapper between them and `db::models` rows.
//!
//! Domain values never carry `Option` for text: an absent column becomes an
//! empty string, and an empty string is written back as NULL. Optional
//! timestamps stay `Option`.

mod advertisement;
mod nullable;
mod profile;
mod user;

pub use advertisement::{AdPhoto, Advertisement, Category, PromotionType, Review};
pub use nullable::{count_from_db, from_nullable, id_from_db, id_to_db, mark_from_db, to_nullable};
pub use profile::{MyAdvertisement, ProfileReview, ProfileStatistic};
pub use user::{NewUser, User, UserRole};

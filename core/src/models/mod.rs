// core/src/models/mod.rs

//! Data structures representing database entities.

pub mod course;
pub mod enrollment;
pub mod kit;
pub mod order;
pub mod review;
pub mod tag;
pub mod user;

pub use course::{Course, CourseModule, Instructor};
pub use enrollment::{EnrolledCourse, Enrollment, EnrollmentStatus, EnrollmentWithCourse};
pub use kit::{Difficulty, Kit, KitImage};
pub use order::{Order, OrderStatus, OrderWithKit, ShippingAddress};
pub use review::{Review, ReviewAuthor, ReviewSubject, ReviewView, ReviewWithAuthor};
pub use tag::Tag;
pub use user::{NewUser, Role, User, UserProfile};

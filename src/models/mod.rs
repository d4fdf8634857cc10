pub mod course;
pub mod filiere;
pub mod notification;
pub mod pagination;

pub use course::{Course, CourseStatus, Named, Reference};
pub use filiere::{Filiere, Niveau};
pub use notification::{Notification, NotificationData};
pub use pagination::Paginated;

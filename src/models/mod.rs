pub mod seat;
pub mod showtime;
pub mod order;
pub mod movie;
pub mod genre;

pub use seat::{Seat, SeatClass, SeatId};
pub use showtime::{PriceTable, Showtime};
pub use order::CheckoutOrder;
pub use movie::{Movie, MovieDetails, MoviePage, Video, VideoList};

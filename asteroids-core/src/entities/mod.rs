mod asteroid;
mod bullet;
mod ship;
mod ufo;

pub use asteroid::{Asteroid, AsteroidSize};
pub use bullet::Bullet;
pub use ship::Ship;
pub use ufo::Ufo;

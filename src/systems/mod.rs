mod movement;
mod rotate;

pub use movement::MovementSystem;
pub use rotate::RotateSystem;

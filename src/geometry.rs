pub mod pendulum;

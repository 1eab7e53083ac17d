pub mod brightness;
pub mod effect;
pub mod led_state;

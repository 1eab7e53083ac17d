/// The style the daemon uses for a static color.
pub const NO_ANIMATION: &str = "NoAnimation";

/// Every style the daemon accepts.
pub const EFFECT_LIST: [&str; 25] = [
    "NoAnimation",
    "Lightning",
    "JCORSAIR_ColorWave",
    "Energy",
    "ColorRing",
    "Flame",
    "JCORSAIR_Clock",
    "JCORSAIR_ColorShift",
    "Direct Lighting Control",
    "Stack",
    "MusicConcert",
    "DoubleMeteor",
    "MusicMusic",
    "RainbowDoubleflashing",
    "Direct All Sync",
    "Flashing",
    "MusicRecreation",
    "Weather",
    "JCORSAIR_Visor",
    "JCORSAIR_ColorPulse",
    "CPUTemp",
    "Planetary",
    "Meteor",
    "Rainbow",
    "Breathing",
];

/// Exact, case-sensitive match. The daemon compares style names verbatim.
pub fn is_known_effect(name: &str) -> bool {
    EFFECT_LIST.contains(&name)
}

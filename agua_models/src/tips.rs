use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationTip {
    pub title: &'static str,
    pub text: &'static str,
}

pub const HYDRATION_TIPS: [HydrationTip; 5] = [
    HydrationTip {
        title: "💧 Hydration is Life 💧",
        text: "Drinking water improves your focus and keeps your mind sharp!",
    },
    HydrationTip {
        title: "💧 Water is Health 💧",
        text: "Proper hydration helps digestion and keeps your body balanced!",
    },
    HydrationTip {
        title: "💧 Stay Hydrated 💧",
        text: "Water keeps your skin healthy and glowing every day!",
    },
    HydrationTip {
        title: "💧 Life in Motion 💧",
        text: "Drinking water regularly gives you energy for your activities!",
    },
    HydrationTip {
        title: "💧 Natural Balance 💧",
        text: "Water regulates your body temperature in any weather!",
    },
];

pub fn random_tip() -> HydrationTip {
    *HYDRATION_TIPS
        .choose(&mut rand::rng())
        .unwrap_or(&HYDRATION_TIPS[0])
}

//! Nutrition trivia shown when the app starts

use rand::seq::SliceRandom;

pub const FUN_FACTS: [&str; 5] = [
    "Did you know? The average adult eats about 1,000 calories just to maintain basic bodily functions while sleeping.",
    "Fascinating fact: Celery is often called a 'negative-calorie food' because it takes more calories to digest than it contains.",
    "Cool calorie tip: Laughing for 10-15 minutes can burn between 10-40 calories!",
    "Nutrition nugget: Your brain uses about 20% of your daily calorie intake, despite being only 2% of your body weight.",
    "Food for thought: Spicy foods containing capsaicin can temporarily boost your metabolism by up to 8%!",
];

/// Pick one fact uniformly at random
pub fn random_fun_fact() -> &'static str {
    FUN_FACTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FUN_FACTS[0])
}

pub mod synthetic_score;

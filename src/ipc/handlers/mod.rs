pub mod core;
pub mod exams;
pub mod leaderboard;
pub mod predict;
pub mod reports;
pub mod students;
pub mod workbook;

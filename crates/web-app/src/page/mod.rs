pub mod category_workouts;
pub mod exercise_library;
pub mod workout_detail;
pub mod workout_editor;
pub mod workout_list;

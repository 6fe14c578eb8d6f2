use async_trait::async_trait;
use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use super::{
    CatalogRow, LikeRow, NewWorkoutExercise, StoreError, WorkoutDetail, WorkoutExerciseRow,
    WorkoutFields, WorkoutRow, WorkoutStore,
};

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS workouts (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT,
        title TEXT NOT NULL,
        description TEXT,
        date DATE NOT NULL,
        duration_minutes INTEGER,
        likes INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS exercises (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT,
        equipment TEXT
    )",
    "CREATE TABLE IF NOT EXISTS workout_exercises (
        id BIGSERIAL PRIMARY KEY,
        workout_id BIGINT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
        exercise_id TEXT NOT NULL,
        name TEXT,
        body_part TEXT,
        equipment TEXT,
        position INTEGER NOT NULL DEFAULT 0,
        sets INTEGER NOT NULL,
        reps INTEGER NOT NULL,
        weight DOUBLE PRECISION NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        notes TEXT
    )",
];

const WORKOUT_COLUMNS: &str =
    "w.id, w.user_id, w.title, w.description, w.date, w.duration_minutes, w.likes";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to the database and creates missing tables.
    pub async fn connect(database_url: &str) -> Result<Self, anyhow::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.create_schema().await?;
        info!("database schema is ready");
        Ok(store)
    }

    async fn create_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl WorkoutStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn workouts(&self) -> Result<Vec<WorkoutRow>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS}, COUNT(DISTINCT we.position) AS exercise_count
            FROM workouts w
            LEFT JOIN workout_exercises we ON w.id = we.workout_id
            GROUP BY w.id
            ORDER BY w.date DESC, w.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(counted_workout_row)
            .collect::<Result<_, _>>()?)
    }

    async fn workout(&self, id: i64) -> Result<Option<WorkoutDetail>, StoreError> {
        let Some(workout) = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts w WHERE w.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let exercises = sqlx::query(
            "SELECT we.id, we.workout_id, we.exercise_id,
                COALESCE(we.name, e.name) AS name,
                COALESCE(we.body_part, e.category) AS category,
                COALESCE(we.equipment, e.equipment) AS equipment,
                we.position, we.sets, we.reps, we.weight, we.completed, we.notes
            FROM workout_exercises we
            LEFT JOIN exercises e ON we.exercise_id = e.id
            WHERE we.workout_id = $1
            ORDER BY we.position, we.sets, we.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(WorkoutDetail {
            workout: workout_row(&workout)?,
            exercises: exercises
                .iter()
                .map(workout_exercise_row)
                .collect::<Result<_, _>>()?,
        }))
    }

    async fn workouts_by_category(&self, category: &str) -> Result<Vec<WorkoutRow>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS}, COUNT(DISTINCT we.position) AS exercise_count
            FROM workouts w
            LEFT JOIN workout_exercises we ON w.id = we.workout_id
            WHERE EXISTS (
                SELECT 1 FROM workout_exercises c
                LEFT JOIN exercises e ON c.exercise_id = e.id
                WHERE c.workout_id = w.id
                    AND LOWER(COALESCE(c.body_part, e.category)) = LOWER($1)
            )
            GROUP BY w.id
            ORDER BY w.date DESC, w.id DESC"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(counted_workout_row)
            .collect::<Result<_, _>>()?)
    }

    async fn exercises(&self) -> Result<Vec<CatalogRow>, StoreError> {
        let rows = sqlx::query("SELECT id, name, category, equipment FROM exercises ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(catalog_row).collect::<Result<_, _>>()?)
    }

    async fn exercises_by_category(&self, category: &str) -> Result<Vec<CatalogRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, category, equipment FROM exercises
            WHERE category = $1
            ORDER BY name",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(catalog_row).collect::<Result<_, _>>()?)
    }

    async fn create_workout(&self, fields: WorkoutFields) -> Result<WorkoutRow, StoreError> {
        let row = sqlx::query(
            "INSERT INTO workouts AS w (user_id, title, description, date, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING w.id, w.user_id, w.title, w.description, w.date, w.duration_minutes, w.likes",
        )
        .bind(fields.user_id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.date)
        .bind(fields.duration_minutes)
        .fetch_one(&self.pool)
        .await?;
        Ok(workout_row(&row)?)
    }

    async fn create_workout_exercise(
        &self,
        row: NewWorkoutExercise,
    ) -> Result<WorkoutExerciseRow, StoreError> {
        let row = sqlx::query(
            "INSERT INTO workout_exercises
                (workout_id, exercise_id, name, body_part, equipment, position, sets, reps, weight,
                completed, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, workout_id, exercise_id, name, body_part AS category, equipment,
                position, sets, reps, weight, completed, notes",
        )
        .bind(row.workout_id)
        .bind(row.exercise_id)
        .bind(row.name)
        .bind(row.body_part)
        .bind(row.equipment)
        .bind(row.position)
        .bind(row.sets)
        .bind(row.reps)
        .bind(row.weight)
        .bind(row.completed)
        .bind(row.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(workout_exercise_row(&row)?)
    }

    async fn update_workout(
        &self,
        id: i64,
        fields: WorkoutFields,
    ) -> Result<Option<WorkoutRow>, StoreError> {
        let row = sqlx::query(
            "UPDATE workouts AS w
            SET title = $1, description = $2, date = $3, duration_minutes = $4
            WHERE w.id = $5
            RETURNING w.id, w.user_id, w.title, w.description, w.date, w.duration_minutes, w.likes",
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.date)
        .bind(fields.duration_minutes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(workout_row).transpose()?)
    }

    async fn delete_workout(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_workout_exercises(&self, workout_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM workout_exercises WHERE workout_id = $1")
            .bind(workout_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn like_workout(&self, id: i64) -> Result<Option<LikeRow>, StoreError> {
        let row = sqlx::query(
            "UPDATE workouts
            SET likes = COALESCE(likes, 0) + 1
            WHERE id = $1
            RETURNING id, likes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row
            .map(|row| {
                Ok::<_, sqlx::Error>(LikeRow {
                    id: row.try_get("id")?,
                    likes: row.try_get("likes")?,
                })
            })
            .transpose()?)
    }
}

fn workout_row(row: &PgRow) -> Result<WorkoutRow, sqlx::Error> {
    Ok(WorkoutRow {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        date: row.try_get("date")?,
        duration_minutes: row.try_get("duration_minutes")?,
        likes: row.try_get("likes")?,
        exercise_count: None,
    })
}

fn counted_workout_row(row: &PgRow) -> Result<WorkoutRow, sqlx::Error> {
    Ok(WorkoutRow {
        exercise_count: Some(row.try_get("exercise_count")?),
        ..workout_row(row)?
    })
}

fn workout_exercise_row(row: &PgRow) -> Result<WorkoutExerciseRow, sqlx::Error> {
    Ok(WorkoutExerciseRow {
        id: row.try_get("id")?,
        workout_id: row.try_get("workout_id")?,
        exercise_id: row.try_get("exercise_id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        equipment: row.try_get("equipment")?,
        position: row.try_get("position")?,
        sets: row.try_get("sets")?,
        reps: row.try_get("reps")?,
        weight: row.try_get("weight")?,
        completed: row.try_get("completed")?,
        notes: row.try_get("notes")?,
    })
}

fn catalog_row(row: &PgRow) -> Result<CatalogRow, sqlx::Error> {
    Ok(CatalogRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        equipment: row.try_get("equipment")?,
    })
}

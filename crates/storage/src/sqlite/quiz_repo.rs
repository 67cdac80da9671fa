use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use quiz_core::model::{
    Question, QuestionBank, QuizAvailability, QuizId, QuizMeta, QuizOption,
};

use super::SqliteRepository;
use super::mapping::{id_to_i64, question_id_from_i64, quiz_id_from_i64, ser};
use crate::catalog::QuizCatalog;
use crate::repository::StorageError;

fn quiz_from_row(row: &SqliteRow) -> Result<QuizMeta, StorageError> {
    let id = quiz_id_from_i64(row.try_get("id").map_err(ser)?)?;
    let title: String = row.try_get("title").map_err(ser)?;
    let is_open: i64 = row.try_get("is_open").map_err(ser)?;
    Ok(QuizMeta::new(
        id,
        title,
        QuizAvailability::from_is_open(is_open != 0),
    ))
}

fn question_from_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let options_json: String = row.try_get("options_json").map_err(ser)?;
    let options: Vec<QuizOption> = serde_json::from_str(&options_json).map_err(ser)?;
    Ok(Question {
        id: question_id_from_i64(row.try_get("id").map_err(ser)?)?,
        text: row.try_get("text").map_err(ser)?,
        options,
        correct_key: row.try_get("correct_key").map_err(ser)?,
    })
}

#[async_trait]
impl QuizCatalog for SqliteRepository {
    async fn list_quizzes(&self) -> Result<Vec<QuizMeta>, StorageError> {
        let rows = sqlx::query("SELECT id, title, is_open FROM quizzes ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut quizzes = Vec::with_capacity(rows.len());
        for row in rows {
            quizzes.push(quiz_from_row(&row)?);
        }
        Ok(quizzes)
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<QuizMeta>, StorageError> {
        let row = sqlx::query("SELECT id, title, is_open FROM quizzes WHERE id = ?1")
            .bind(id_to_i64("quiz_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => quiz_from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn question_bank(&self, id: QuizId) -> Result<QuestionBank, StorageError> {
        if self.get_quiz(id).await?.is_none() {
            return Err(StorageError::NotFound);
        }

        let rows = sqlx::query(
            r"
            SELECT id, text, options_json, correct_key
            FROM questions
            WHERE quiz_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id_to_i64("quiz_id", id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(question_from_row(&row)?);
        }
        QuestionBank::new(questions).map_err(ser)
    }

    async fn upsert_quiz(&self, meta: &QuizMeta, bank: &QuestionBank) -> Result<(), StorageError> {
        let quiz_id = id_to_i64("quiz_id", meta.id.value())?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO quizzes (id, title, is_open)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                is_open = excluded.is_open
            ",
        )
        .bind(quiz_id)
        .bind(meta.title.as_str())
        .bind(i64::from(meta.is_open()))
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query("DELETE FROM questions WHERE quiz_id = ?1")
            .bind(quiz_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for (position, question) in bank.iter().enumerate() {
            let options_json = serde_json::to_string(&question.options).map_err(ser)?;
            sqlx::query(
                r"
                INSERT INTO questions (quiz_id, position, id, text, options_json, correct_key)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(quiz_id)
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(id_to_i64("question_id", question.id.value())?)
            .bind(question.text.as_str())
            .bind(options_json)
            .bind(question.correct_key.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}

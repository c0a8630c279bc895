/*
 * Responsibility
 * - drinks テーブル向け SQLx 操作
 * - recipe は TEXT カラムに JSON 配列として保存する
 * - title の一意制約違反は RepoError::Conflict として返す
 */
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = RepoError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str(&row.recipe).map_err(|source| {
            RepoError::CorruptRecipe {
                id: row.id,
                source,
            }
        })?;

        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String, RepoError> {
    serde_json::to_string(recipe).map_err(RepoError::Encode)
}

pub async fn list(db: &PgPool) -> Result<Vec<Drink>, RepoError> {
    let rows = sqlx::query_as::<_, DrinkRow>(
        r#"
        SELECT id, title, recipe
        FROM drinks
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    rows.into_iter().map(Drink::try_from).collect()
}

pub async fn create(db: &PgPool, title: &str, recipe: &[Ingredient]) -> Result<Drink, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        INSERT INTO drinks (title, recipe)
        VALUES ($1, $2)
        RETURNING id, title, recipe
        "#,
    )
    .bind(title)
    .bind(encode_recipe(recipe)?)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    row.try_into()
}

pub async fn update(
    db: &PgPool,
    drink_id: i64,
    title: Option<&str>,
    recipe: Option<&[Ingredient]>,
) -> Result<Option<Drink>, RepoError> {
    let recipe = recipe.map(encode_recipe).transpose()?;

    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        UPDATE drinks
        SET
            title = COALESCE($2, title),
            recipe = COALESCE($3, recipe)
        WHERE id = $1
        RETURNING id, title, recipe
        "#,
    )
    .bind(drink_id)
    .bind(title)
    .bind(recipe)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    row.map(Drink::try_from).transpose()
}

pub async fn delete(db: &PgPool, drink_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM drinks
        WHERE id = $1
        "#,
    )
    .bind(drink_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_recipe_decodes() {
        let row = DrinkRow {
            id: 1,
            title: "water".into(),
            recipe: r#"[{"name": "water", "color": "blue", "parts": 1}]"#.into(),
        };

        let drink = Drink::try_from(row).unwrap();
        assert_eq!(
            drink.recipe,
            vec![Ingredient {
                name: "water".into(),
                color: "blue".into(),
                parts: 1
            }]
        );
    }

    #[test]
    fn unreadable_recipe_is_reported_with_id() {
        let row = DrinkRow {
            id: 7,
            title: "mystery".into(),
            recipe: "{'name': 'water'}".into(),
        };

        assert!(matches!(
            Drink::try_from(row),
            Err(RepoError::CorruptRecipe { id: 7, .. })
        ));
    }
}

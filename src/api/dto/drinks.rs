/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short (一覧: color/parts のみ) と long (詳細: name を含む) の 2 つの表現
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::{Deserialize, Serialize};

use crate::repos::drink_repo::{Drink, Ingredient};

pub const TITLE_MAX_CHARS: usize = 80;

/// Clients send either a single ingredient or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

impl RecipeInput {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::One(i) => vec![i],
            RecipeInput::Many(all) => all,
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        let ingredients = match self {
            RecipeInput::One(i) => std::slice::from_ref(i),
            RecipeInput::Many(all) => all.as_slice(),
        };
        if ingredients.is_empty() {
            return Err("recipe must contain at least one ingredient");
        }
        for i in ingredients {
            if i.name.trim().is_empty() {
                return Err("ingredient name is required");
            }
            if i.color.trim().is_empty() {
                return Err("ingredient color is required");
            }
            if i.parts == 0 {
                return Err("ingredient parts must be at least 1");
            }
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title is required");
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err("title must be <= 80 chars");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

impl CreateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_title(&self.title)?;
        self.recipe.validate()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.is_none() && self.recipe.is_none() {
            return Err("title or recipe is required");
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(recipe) = &self.recipe {
            recipe.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

/// Public menu view: ingredient names stay hidden.
#[derive(Debug, Serialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<Drink> for ShortDrink {
    fn from(d: Drink) -> Self {
        Self {
            id: d.id,
            title: d.title,
            recipe: d
                .recipe
                .into_iter()
                .map(|i| ShortIngredient {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<Drink> for LongDrink {
    fn from(d: Drink) -> Self {
        Self {
            id: d.id,
            title: d.title,
            recipe: d.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mocha() -> Drink {
        Drink {
            id: 3,
            title: "mocha".into(),
            recipe: vec![
                Ingredient {
                    name: "espresso".into(),
                    color: "brown".into(),
                    parts: 1,
                },
                Ingredient {
                    name: "chocolate".into(),
                    color: "#3b1f0e".into(),
                    parts: 2,
                },
            ],
        }
    }

    #[test]
    fn short_hides_ingredient_names() {
        let short = serde_json::to_value(ShortDrink::from(mocha())).unwrap();
        assert_eq!(
            short,
            json!({
                "id": 3,
                "title": "mocha",
                "recipe": [
                    {"color": "brown", "parts": 1},
                    {"color": "#3b1f0e", "parts": 2},
                ],
            })
        );
    }

    #[test]
    fn long_keeps_full_recipe() {
        let long = serde_json::to_value(LongDrink::from(mocha())).unwrap();
        assert_eq!(long["recipe"][1]["name"], "chocolate");
    }

    #[test]
    fn single_ingredient_is_normalized_to_list() {
        let req: CreateDrinkRequest = serde_json::from_value(json!({
            "title": "water",
            "recipe": {"name": "water", "color": "blue", "parts": 1},
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.recipe.into_vec().len(), 1);
    }

    #[test]
    fn create_validation() {
        let cases = [
            (json!({"title": " ", "recipe": []}), "title is required"),
            (
                json!({"title": "water", "recipe": []}),
                "recipe must contain at least one ingredient",
            ),
            (
                json!({"title": "water", "recipe": [{"name": "", "color": "blue", "parts": 1}]}),
                "ingredient name is required",
            ),
            (
                json!({"title": "water", "recipe": [{"name": "water", "color": "blue", "parts": 0}]}),
                "ingredient parts must be at least 1",
            ),
            (
                json!({"title": "x".repeat(81), "recipe": [{"name": "w", "color": "b", "parts": 1}]}),
                "title must be <= 80 chars",
            ),
        ];

        for (body, expected) in cases {
            let req: CreateDrinkRequest = serde_json::from_value(body).unwrap();
            assert_eq!(req.validate(), Err(expected));
        }
    }

    #[test]
    fn update_needs_at_least_one_field() {
        let req: UpdateDrinkRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.validate(), Err("title or recipe is required"));

        let req: UpdateDrinkRequest = serde_json::from_value(json!({"title": "latte"})).unwrap();
        assert!(req.validate().is_ok());
    }
}

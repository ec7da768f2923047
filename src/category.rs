//! The fixed set of transaction categories, their display colors and whether
//! they apply to expenses or income.

use std::{fmt::Display, str::FromStr};

use axum::{
    Json,
    extract::{Query, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionType};

/// The color used for names that are not in the registry.
pub const DEFAULT_COLOR: &str = "#A9A9A9";

/// A label for what money was spent on or where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transportation,
    Entertainment,
    Shopping,
    Healthcare,
    Utilities,
    Housing,
    Education,
    Travel,
    Other,
    Salary,
    Freelance,
    Investment,
    Gift,
}

impl Category {
    /// Every category in display order, expense categories first.
    pub const ALL: [Category; 14] = [
        Category::FoodAndDining,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Healthcare,
        Category::Utilities,
        Category::Housing,
        Category::Education,
        Category::Travel,
        Category::Other,
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Gift,
    ];

    /// The display name, which is also how the category is stored and serialized.
    pub fn name(self) -> &'static str {
        match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Healthcare => "Healthcare",
            Category::Utilities => "Utilities",
            Category::Housing => "Housing",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::Other => "Other",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::Gift => "Gift",
        }
    }

    /// The hex color used for this category in charts.
    pub fn color(self) -> &'static str {
        match self {
            Category::FoodAndDining => "#FF6B6B",
            Category::Transportation => "#4ECDC4",
            Category::Entertainment => "#45B7D1",
            Category::Shopping => "#96CEB4",
            Category::Healthcare => "#FFEAA7",
            Category::Utilities => "#DDA0DD",
            Category::Housing => "#98D8C8",
            Category::Education => "#F7DC6F",
            Category::Travel => "#BB8FCE",
            Category::Other => "#A9A9A9",
            Category::Salary => "#2ECC71",
            Category::Freelance => "#3498DB",
            Category::Investment => "#F39C12",
            Category::Gift => "#E74C3C",
        }
    }

    /// Whether the category is used for expenses or income.
    pub fn kind(self) -> TransactionType {
        match self {
            Category::Salary | Category::Freelance | Category::Investment | Category::Gift => {
                TransactionType::Income
            }
            _ => TransactionType::Expense,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| Error::invalid_field("category", &format!("{s} is not a valid category")))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.name()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// Get the color for `category_name`, or [DEFAULT_COLOR] if the name is not
/// a known category.
#[cfg_attr(not(test), allow(dead_code))]
pub fn color_of(category_name: &str) -> &'static str {
    category_name
        .parse::<Category>()
        .map(Category::color)
        .unwrap_or(DEFAULT_COLOR)
}

/// A category name and color as shown in category pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    /// The category's display name.
    pub name: &'static str,
    /// The category's hex color.
    pub color: &'static str,
}

/// The categories valid for `kind` in display order.
pub fn categories_for(kind: TransactionType) -> Vec<CategoryOption> {
    Category::ALL
        .into_iter()
        .filter(|category| category.kind() == kind)
        .map(|category| CategoryOption {
            name: category.name(),
            color: category.color(),
        })
        .collect()
}

/// The optional `type` filter of the category listing.
#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// A category entry in the listing of all categories.
#[derive(Debug, Serialize)]
struct CategoryListing {
    name: &'static str,
    color: &'static str,
    #[serde(rename = "type")]
    kind: TransactionType,
}

/// A route handler that lists the categories for a transaction type, or all
/// categories with their type if none is given.
pub async fn get_categories_endpoint(
    query: Result<Query<CategoriesQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    match query.kind.as_deref() {
        None => {
            let listing: Vec<CategoryListing> = Category::ALL
                .into_iter()
                .map(|category| CategoryListing {
                    name: category.name(),
                    color: category.color(),
                    kind: category.kind(),
                })
                .collect();

            Json(listing).into_response()
        }
        Some(raw_kind) => match raw_kind.parse::<TransactionType>() {
            Ok(kind) => Json(categories_for(kind)).into_response(),
            Err(error) => error.into_response(),
        },
    }
}


#[cfg(test)]
mod categories_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::endpoints;

    use super::get_categories_endpoint;

    fn get_test_server() -> TestServer {
        let app = Router::new().route(endpoints::CATEGORIES_API, get(get_categories_endpoint));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn lists_income_categories() {
        let server = get_test_server();

        let response = server
            .get(endpoints::CATEGORIES_API)
            .add_query_param("type", "income")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body[0],
            json!({"name": "Salary", "color": "#2ECC71"}),
            "got {body}"
        );
        assert_eq!(body.as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn lists_all_categories_without_type() {
        let server = get_test_server();

        let response = server.get(endpoints::CATEGORIES_API).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body.as_array().map(Vec::len), Some(14));
        assert_eq!(body[13]["type"], "income");
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let server = get_test_server();

        let response = server
            .get(endpoints::CATEGORIES_API)
            .add_query_param("type", "transfer")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

//! Turns a search result into the answer shown to the shopper.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use katalog_core::Product;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::warn;

use crate::llm::{grounded_prompt, LlmClient};

const ANSWER_TEMPLATE_NAME: &str = "answer.txt";

// Line continuations keep the output free of blank lines.
const ANSWER_TEMPLATE: &str = "{{ message }}\
{% for product in products %}
{{ loop.index }}. {{ product.name }}{% if product.brand %} ({{ product.brand }}){% endif %} \
- {{ product.price | rupiah }} - rating {{ product.rating }}\
{% endfor %}";

#[async_trait]
pub trait ResponseRenderer: Send + Sync {
    /// `fallback_message` is the search status line; renderers must always be
    /// able to answer with it alone.
    async fn render(
        &self,
        question: &str,
        products: &[Product],
        fallback_message: &str,
    ) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ProductLine<'a> {
    name: &'a str,
    brand: &'a str,
    price: u64,
    rating: f64,
}

/// Deterministic renderer: status message followed by a numbered list.
#[derive(Clone, Debug)]
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.register_filter("rupiah", rupiah_filter);
        tera.add_raw_template(ANSWER_TEMPLATE_NAME, ANSWER_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render_answer(&self, products: &[Product], message: &str) -> Result<String> {
        let lines: Vec<ProductLine<'_>> = products
            .iter()
            .map(|product| ProductLine {
                name: &product.name,
                brand: &product.brand,
                price: product.price,
                rating: product.rating(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("message", message);
        context.insert("products", &lines);

        Ok(self.tera.render(ANSWER_TEMPLATE_NAME, &context)?)
    }
}

#[async_trait]
impl ResponseRenderer for TemplateRenderer {
    async fn render(
        &self,
        _question: &str,
        products: &[Product],
        fallback_message: &str,
    ) -> Result<String> {
        self.render_answer(products, fallback_message)
    }
}

/// Asks the model for an answer and falls back to the template when the model
/// errors or answers with blank text.
pub struct LlmRenderer<C: LlmClient> {
    client: C,
    fallback: TemplateRenderer,
}

impl<C: LlmClient> LlmRenderer<C> {
    pub fn new(client: C) -> Result<Self> {
        Ok(Self { client, fallback: TemplateRenderer::new()? })
    }
}

#[async_trait]
impl<C: LlmClient> ResponseRenderer for LlmRenderer<C> {
    async fn render(
        &self,
        question: &str,
        products: &[Product],
        fallback_message: &str,
    ) -> Result<String> {
        let prompt = grounded_prompt(question, fallback_message, products);

        match self.client.complete(&prompt).await {
            Ok(answer) if !answer.trim().is_empty() => return Ok(answer.trim().to_owned()),
            Ok(_) => {
                warn!(
                    event_name = "render.llm.blank",
                    "model returned blank answer, using template"
                );
            }
            Err(error) => {
                warn!(
                    event_name = "render.llm.failed",
                    error = %error,
                    "model completion failed, using template"
                );
            }
        }

        self.fallback.render_answer(products, fallback_message)
    }
}

/// Formats whole rupiah with `.` thousands grouping, e.g. `Rp 4.599.000`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("Rp {grouped}")
}

fn rupiah_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let amount = match value {
        tera::Value::Number(number) => number.as_u64().or_else(|| {
            number.as_f64().filter(|amount| amount.is_finite() && *amount >= 0.0).map(|amount| {
                amount.round() as u64
            })
        }),
        tera::Value::Null => Some(0),
        _ => None,
    }
    .ok_or_else(|| tera::Error::msg("rupiah filter expects a non-negative number"))?;

    Ok(tera::Value::String(format_rupiah(amount)))
}

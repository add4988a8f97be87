use anyhow::Result;
use katalog_agent::{ResponseRenderer, TemplateRenderer};
use katalog_core::config::LoadOptions;
use katalog_core::{interpret, Product, QueryIntent, SearchResult, SearchStage};
use serde::Serialize;

use crate::commands::{open_session, payload_fields, resolve_limit, CommandResult};

#[derive(Debug, Serialize)]
struct AskPayload<'a> {
    question: &'a str,
    intent: &'a QueryIntent,
    limit: usize,
    stage: SearchStage,
    products: &'a [Product],
    answer: String,
}

pub fn run(options: &LoadOptions, question: &str, limit: Option<i64>) -> CommandResult {
    let session = match open_session(options) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("ask", &error),
    };

    let limit = resolve_limit(limit, session.config.search.smart_limit);
    let intent = interpret(question);
    let result = session.engine.ask(question, limit);

    let answer = match render_answer(question, &result) {
        Ok(answer) => answer,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "render",
                format!("failed to render answer: {error:#}"),
                5,
            );
        }
    };

    let fields = payload_fields(&AskPayload {
        question,
        intent: &intent,
        limit,
        stage: result.stage,
        products: &result.products,
        answer,
    });
    CommandResult::success_with("ask", result.message, fields)
}

fn render_answer(question: &str, result: &SearchResult) -> Result<String> {
    let renderer = TemplateRenderer::new()?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(renderer.render(question, &result.products, &result.message))
}

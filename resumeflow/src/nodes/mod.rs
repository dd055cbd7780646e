//! Node library for the three optimization phases.
//!
//! Research: preparer → jd_analyzer → prepare_research → query_writer → web_searcher
//! → reflection (loops back to web_searcher) → final_answer.
//! Analyze: prepare_analyzer → route_next_analysis ⇄ analyze_category → combiner.
//! Rewrite: prepare_rewriter → route_next_section ⇄ rewrite_section → combine_sections.
//!
//! Each node returns only the channels it writes; routing lives in [`routes`].

mod analyzer;
mod final_answer;
mod jd_analyzer;
mod preparer;
pub mod prompts;
mod query_writer;
mod queue;
mod reflection;
mod retry;
mod rewriter;
pub mod routes;
mod web_searcher;

pub use analyzer::{
    category_title, AnalyzeCategoryNode, CombinerNode, PrepareAnalyzerNode, ANALYSIS_CATEGORIES,
};
pub use final_answer::FinalAnswerNode;
pub use jd_analyzer::JdAnalyzerNode;
pub use preparer::{PrepareResearchNode, PreparerNode};
pub use query_writer::{research_topic_for, QueryWriterNode, MAX_QUERIES};
pub use queue::QueueRouterNode;
pub use reflection::ReflectionNode;
pub use retry::RetryPolicy;
pub use rewriter::{CombineSectionsNode, PrepareRewriterNode, RewriteSectionNode};
pub use web_searcher::WebSearcherNode;

use crate::error::AgentError;
use crate::graph::RunContext;
use crate::message::Message;

/// Node names as they appear in frames and progress logs.
pub mod names {
    pub const PREPARER: &str = "preparer";
    pub const JD_ANALYZER: &str = "jd_analyzer";
    pub const PREPARE_RESEARCH: &str = "prepare_research";
    pub const QUERY_WRITER: &str = "query_writer";
    pub const WEB_SEARCHER: &str = "web_searcher";
    pub const REFLECTION: &str = "reflection";
    pub const FINAL_ANSWER: &str = "final_answer";
    pub const PREPARE_ANALYZER: &str = "prepare_analyzer";
    pub const ROUTE_NEXT_ANALYSIS: &str = "route_next_analysis";
    pub const ANALYZE_CATEGORY: &str = "analyze_category";
    pub const COMBINER: &str = "combiner";
    pub const PREPARE_REWRITER: &str = "prepare_rewriter";
    pub const ROUTE_NEXT_SECTION: &str = "route_next_section";
    pub const REWRITE_SECTION: &str = "rewrite_section";
    pub const COMBINE_SECTIONS: &str = "combine_sections";
}

/// One system + user turn against the run's LLM; returns the assistant text.
pub(crate) async fn ask(ctx: &RunContext, system: &str, user: String) -> Result<String, AgentError> {
    let messages = [Message::system(system), Message::user(user)];
    Ok(ctx.services.llm.invoke(&messages).await?.content)
}

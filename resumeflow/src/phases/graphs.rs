//! Graph definitions for the research, analyze and rewrite phases.

use std::sync::Arc;

use serde_json::json;

use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::nodes::{
    names, routes, AnalyzeCategoryNode, CombineSectionsNode, CombinerNode, FinalAnswerNode,
    JdAnalyzerNode, PrepareAnalyzerNode, PrepareResearchNode, PrepareRewriterNode, PreparerNode,
    QueryWriterNode, QueueRouterNode, ReflectionNode, RewriteSectionNode, WebSearcherNode,
};
use crate::state::{keys, Reducer};

/// preparer → jd_analyzer → prepare_research → query_writer → web_searcher →
/// reflection ⇄ web_searcher → final_answer.
pub fn build_research_graph() -> Result<CompiledStateGraph, CompilationError> {
    let mut graph = StateGraph::new();
    graph
        .add_channel(keys::SUMMARIES, Reducer::Append, json!([]))
        .add_channel(keys::ANALYSIS_REPORT, Reducer::Merge, json!({}))
        .add_channel(keys::QUERIES, Reducer::Replace, json!([]))
        .add_channel(keys::RESEARCH_LOOP_COUNT, Reducer::Replace, json!(0))
        .add_node(names::PREPARER, Arc::new(PreparerNode))
        .add_node(names::JD_ANALYZER, Arc::new(JdAnalyzerNode))
        .add_node(names::PREPARE_RESEARCH, Arc::new(PrepareResearchNode))
        .add_node(names::QUERY_WRITER, Arc::new(QueryWriterNode))
        .add_node(names::WEB_SEARCHER, Arc::new(WebSearcherNode))
        .add_node(names::REFLECTION, Arc::new(ReflectionNode))
        .add_node(names::FINAL_ANSWER, Arc::new(FinalAnswerNode))
        .add_edge(START, names::PREPARER)
        .add_edge(names::PREPARER, names::JD_ANALYZER)
        .add_edge(names::JD_ANALYZER, names::PREPARE_RESEARCH)
        .add_edge(names::PREPARE_RESEARCH, names::QUERY_WRITER)
        .add_edge(names::QUERY_WRITER, names::WEB_SEARCHER)
        .add_edge(names::WEB_SEARCHER, names::REFLECTION)
        .add_conditional_edges(
            names::REFLECTION,
            routes::after_reflection,
            [
                (routes::CONTINUE, names::WEB_SEARCHER),
                (routes::END, names::FINAL_ANSWER),
            ],
        )
        .add_edge(names::FINAL_ANSWER, END);
    graph.compile()
}

/// prepare_analyzer → route_next_analysis ⇄ analyze_category → combiner.
///
/// `prepare` decides the category list; [`PrepareAnalyzerNode::new`] uses the
/// standard categories.
pub fn build_analyze_graph(
    prepare: PrepareAnalyzerNode,
) -> Result<CompiledStateGraph, CompilationError> {
    let mut graph = StateGraph::new();
    graph
        .add_channel(keys::PARALLEL_ANALYSIS_RESULTS, Reducer::Append, json!([]))
        .add_channel(keys::ANALYSIS_REPORT, Reducer::Merge, json!({}))
        .add_node(names::PREPARE_ANALYZER, Arc::new(prepare))
        .add_node(
            names::ROUTE_NEXT_ANALYSIS,
            Arc::new(QueueRouterNode::new(
                names::ROUTE_NEXT_ANALYSIS,
                keys::ANALYSIS_TASKS,
                keys::CURRENT_ANALYSIS_TASK,
            )),
        )
        .add_node(names::ANALYZE_CATEGORY, Arc::new(AnalyzeCategoryNode))
        .add_node(names::COMBINER, Arc::new(CombinerNode))
        .add_edge(START, names::PREPARE_ANALYZER)
        .add_edge(names::PREPARE_ANALYZER, names::ROUTE_NEXT_ANALYSIS)
        .add_conditional_edges(
            names::ROUTE_NEXT_ANALYSIS,
            routes::while_current(keys::CURRENT_ANALYSIS_TASK),
            [
                (routes::CONTINUE, names::ANALYZE_CATEGORY),
                (routes::END, names::COMBINER),
            ],
        )
        .add_edge(names::ANALYZE_CATEGORY, names::ROUTE_NEXT_ANALYSIS)
        .add_edge(names::COMBINER, END);
    graph.compile()
}

/// prepare_rewriter → route_next_section ⇄ rewrite_section → combine_sections.
pub fn build_rewrite_graph() -> Result<CompiledStateGraph, CompilationError> {
    let mut graph = StateGraph::new();
    graph
        .add_channel(keys::OPTIMIZED_SECTIONS, Reducer::Merge, json!({}))
        .add_channel(keys::ANALYSIS_REPORT, Reducer::Merge, json!({}))
        .add_node(names::PREPARE_REWRITER, Arc::new(PrepareRewriterNode))
        .add_node(
            names::ROUTE_NEXT_SECTION,
            Arc::new(QueueRouterNode::new(
                names::ROUTE_NEXT_SECTION,
                keys::REWRITE_TASKS,
                keys::CURRENT_TASK,
            )),
        )
        .add_node(names::REWRITE_SECTION, Arc::new(RewriteSectionNode))
        .add_node(names::COMBINE_SECTIONS, Arc::new(CombineSectionsNode))
        .add_edge(START, names::PREPARE_REWRITER)
        .add_edge(names::PREPARE_REWRITER, names::ROUTE_NEXT_SECTION)
        .add_conditional_edges(
            names::ROUTE_NEXT_SECTION,
            routes::while_current(keys::CURRENT_TASK),
            [
                (routes::CONTINUE, names::REWRITE_SECTION),
                (routes::END, names::COMBINE_SECTIONS),
            ],
        )
        .add_edge(names::REWRITE_SECTION, names::ROUTE_NEXT_SECTION)
        .add_edge(names::COMBINE_SECTIONS, END);
    graph.compile()
}

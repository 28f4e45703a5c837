//! # Diagram Tools
//!
//! Diagram synthesis for the Image Curator. The synthesizer is a
//! template lookup over a closed set of kinds, not a generator: the
//! description is carried through as metadata and never alters the
//! diagram body.

use radkit::macros::tool;
use radkit::tools::ToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

const ARCHITECTURE_SKELETON: &str = "```mermaid
graph TD
    Client[Client] --> Gateway[API Gateway]
    Gateway --> Service[Application Service]
    Service --> Cache[(Cache)]
    Service --> Store[(Database)]
    Service --> Queue[[Message Queue]]
    Queue --> Worker[Background Worker]
```";

const FLOWCHART_SKELETON: &str = "```mermaid
graph LR
    Start([Start]) --> Input[Receive Input]
    Input --> Valid{Valid?}
    Valid -- yes --> Process[Process]
    Valid -- no --> Reject[Reject]
    Process --> Done([Done])
    Reject --> Done
```";

const SEQUENCE_SKELETON: &str = "```mermaid
sequenceDiagram
    participant User
    participant Service
    participant Store
    User->>Service: Request
    Service->>Store: Query
    Store-->>Service: Result
    Service-->>User: Response
```";

const RETNET_SKELETON: &str = "```mermaid
graph TD
    Input[Token Embeddings] --> Norm1[LayerNorm]
    Norm1 --> MSR[Multi-Scale Retention]
    MSR --> Add1[Residual Add]
    Add1 --> Norm2[LayerNorm]
    Norm2 --> FFN[Feed-Forward Network]
    FFN --> Add2[Residual Add]
    Add2 --> Output[Block Output]
    MSR -. parallel / recurrent / chunkwise .-> MSR
```";

/// The closed set of diagram kinds the synthesizer knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Architecture,
    Flowchart,
    Sequence,
    RetNet,
}

impl DiagramKind {
    /// Match a requested kind case-insensitively against the closed set
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "diagram" | "architecture" => Some(Self::Architecture),
            "flowchart" => Some(Self::Flowchart),
            "sequence" => Some(Self::Sequence),
            "retnet" => Some(Self::RetNet),
            _ => None,
        }
    }

    /// The static Mermaid skeleton for this kind
    pub fn skeleton(&self) -> &'static str {
        match self {
            Self::Architecture => ARCHITECTURE_SKELETON,
            Self::Flowchart => FLOWCHART_SKELETON,
            Self::Sequence => SEQUENCE_SKELETON,
            Self::RetNet => RETNET_SKELETON,
        }
    }
}

/// Result of a diagram synthesis request
///
/// An unknown kind produces an error-shaped result (`error` set,
/// `markdown` empty) rather than a failure - the curator decides what
/// to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramResult {
    pub markdown: Option<String>,
    pub description: String,
    pub placement: Option<String>,
    pub error: Option<String>,
}

/// Look up the diagram skeleton for a kind.
///
/// Deterministic and pure: the same kind always yields the same body,
/// regardless of description.
pub fn synthesize(kind: &str, description: &str) -> DiagramResult {
    match DiagramKind::parse(kind) {
        Some(k) => DiagramResult {
            markdown: Some(k.skeleton().to_string()),
            description: description.to_string(),
            placement: Some("inline".to_string()),
            error: None,
        },
        None => DiagramResult {
            markdown: None,
            description: description.to_string(),
            placement: None,
            error: Some(format!(
                "Unknown diagram kind '{}'. Valid kinds: diagram, architecture, flowchart, sequence, retnet",
                kind
            )),
        },
    }
}

/// Arguments for diagram synthesis
#[derive(Deserialize, JsonSchema)]
pub struct MakeDiagramArgs {
    /// Diagram kind: "diagram", "architecture", "flowchart", "sequence", or "retnet"
    pub kind: String,
    /// What the diagram is meant to illustrate (metadata only)
    pub description: String,
}

/// Produce a Mermaid diagram skeleton
#[tool(
    description = "Produce a Mermaid diagram skeleton for a closed set of kinds (architecture, flowchart, sequence, retnet). The description is carried as metadata and does not change the diagram."
)]
pub async fn make_diagram(args: MakeDiagramArgs) -> ToolResult {
    let result = synthesize(&args.kind, &args.description);
    match &result.error {
        None => ToolResult::success(json!({
            "markdown": result.markdown,
            "description": result.description,
            "placement": result.placement
        })),
        Some(error) => ToolResult::error(error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_is_deterministic() {
        let a = synthesize("flowchart", "signup flow");
        let b = synthesize("flowchart", "a completely different flow");
        assert_eq!(a.markdown, b.markdown);
        assert!(a.markdown.unwrap().starts_with("```mermaid"));
    }

    #[test]
    fn test_kind_matching_is_case_insensitive() {
        assert_eq!(DiagramKind::parse("Diagram"), Some(DiagramKind::Architecture));
        assert_eq!(DiagramKind::parse("ARCHITECTURE"), Some(DiagramKind::Architecture));
        assert_eq!(DiagramKind::parse("Sequence"), Some(DiagramKind::Sequence));
        assert_eq!(DiagramKind::parse("retnet"), Some(DiagramKind::RetNet));
    }

    #[test]
    fn test_unknown_kind_is_error_shaped() {
        let result = synthesize("pie-chart", "market share");
        assert!(result.markdown.is_none());
        assert!(result.error.is_some());
        assert_eq!(result.description, "market share");
    }

    #[test]
    fn test_description_is_metadata_only() {
        let result = synthesize("retnet", "retention mechanism");
        assert!(!result.markdown.unwrap().contains("retention mechanism"));
        assert_eq!(result.description, "retention mechanism");
    }
}

//! Mermaid templates, one per diagram type
//!
//! Served as "load example" content and used as the diagram fallback.

use crate::payload::DiagramType;

const FLOWCHART: &str = "graph TD
    A[Start] --> B{Decision Point}
    B -->|Yes| C[Process A]
    B -->|No| D[Process B]
    C --> E[End]
    D --> E";

const ORGCHART: &str = "graph TD
    CEO[CEO/Manager] --> A[Team Lead A]
    CEO --> B[Team Lead B]
    A --> A1[Member 1]
    A --> A2[Member 2]
    B --> B1[Member 3]
    B --> B2[Member 4]";

const SEQUENCE: &str = "sequenceDiagram
    participant User as User
    participant System as System
    participant Database as Database

    User->>System: Login Request
    System->>Database: Validate Credentials
    Database-->>System: User Data
    System-->>User: Authentication Success

    User->>System: Data Request
    System->>Database: Query Data
    Database-->>System: Return Results
    System-->>User: Display Data";

const NETWORK: &str = "graph LR
    A[Server] --> B[Router]
    B --> C[Switch]
    C --> D[Device 1]
    C --> E[Device 2]
    C --> F[Device 3]";

const GANTT: &str = "gantt
    title Project Timeline
    dateFormat YYYY-MM-DD
    section Phase 1
    Task 1: 2024-01-01, 30d
    Task 2: after task1, 20d
    section Phase 2
    Task 3: 2024-02-15, 25d";

const GITGRAPH: &str = "gitGraph
    commit
    branch develop
    checkout develop
    commit
    commit
    checkout main
    merge develop
    commit";

const JOURNEY: &str = "journey
    title User Journey
    section Discovery
      Visit Site: 5: User
      Browse: 4: User
    section Action
      Sign Up: 3: User
      Complete: 5: User";

pub const DEFAULT_MINDMAP_ROOT: &str = "Main Topic";

/// Template text for a diagram type. Only the mindmap looks at `description`.
pub fn template(diagram_type: DiagramType, description: &str) -> String {
    match diagram_type {
        DiagramType::Flowchart => FLOWCHART.to_string(),
        DiagramType::Mindmap => mindmap(description),
        DiagramType::Orgchart => ORGCHART.to_string(),
        DiagramType::Sequence => SEQUENCE.to_string(),
        DiagramType::Network => NETWORK.to_string(),
        DiagramType::Gantt => GANTT.to_string(),
        DiagramType::Gitgraph => GITGRAPH.to_string(),
        DiagramType::Journey => JOURNEY.to_string(),
    }
}

/// Like [`template`] for an unparsed type name; unknown names get the flowchart.
pub fn template_for(diagram_type: &str, description: &str) -> String {
    let kind = diagram_type.parse().unwrap_or(DiagramType::Flowchart);
    template(kind, description)
}

/// First two words of the description, or [`DEFAULT_MINDMAP_ROOT`].
pub fn mindmap_root(description: &str) -> String {
    let root = description
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ");
    if root.is_empty() {
        DEFAULT_MINDMAP_ROOT.to_string()
    } else {
        root
    }
}

fn mindmap(description: &str) -> String {
    format!(
        "mindmap
  root(({}))
    Branch 1
      Sub-topic A
      Sub-topic B
    Branch 2
      Sub-topic C
      Sub-topic D",
        mindmap_root(description)
    )
}

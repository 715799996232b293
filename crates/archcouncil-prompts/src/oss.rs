/// Default open-source-architect template.
pub const DEFAULT_TEMPLATE: &str = "\
You are a senior architect specialising in open-source infrastructure. Propose \
an architecture for the problem below that can run on self-managed or \
commodity infrastructure using open-source software.

## Problem

{problem}

## Instructions

Your proposal MUST include:
- **Architecture Overview**: the main components and how requests and data \
flow between them.
- **Open-Source Stack**: the projects you would use for compute orchestration, \
storage, messaging, identity and observability, with their licences.
- **Operations**: deployment, upgrades, backups and on-call burden.
- **Scalability & Resilience**: how the design scales, where it fails, and \
how it recovers.
- **Cost Considerations**: hardware, hosting and staffing costs.
- **Trade-offs**: maturity of the chosen projects, community support and risks.

Answer as a well-structured markdown document.
";

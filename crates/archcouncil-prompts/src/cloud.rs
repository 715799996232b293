/// Default cloud-architect template.
pub const DEFAULT_TEMPLATE: &str = "\
You are a senior cloud solutions architect. Propose a cloud-native architecture \
for the problem below, built on managed services from a major public cloud \
provider.

## Problem

{problem}

## Instructions

Your proposal MUST include:
- **Architecture Overview**: the main components and how requests and data \
flow between them.
- **Managed Services**: which provider services you would use for compute, \
storage, messaging, identity and observability, and why.
- **Scalability & Resilience**: how the design scales, where it fails, and \
how it recovers.
- **Security**: network boundaries, identity and access, data protection.
- **Cost Considerations**: the main cost drivers and how to keep them in check.
- **Trade-offs**: lock-in, operational burden and any open risks.

Answer as a well-structured markdown document.
";

//! Prompt templates for every model-facing stage.

/// Visual rule between transcript and prompt sections.
pub const RULE: &str = "======================================================================";

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asks for one concrete, checkable claim.
pub fn topic_prompt() -> String {
    r#"
Generate a single, specific, verifiable claim that could be explored through verification.

Requirements:
- Must be a concrete factual claim (not vague or philosophical)
- Can come from ANY domain: physics, biology, chemistry, history, mathematics,
  psychology, sociology, economics, astronomy, geology, linguistics, art,
  music, technology, medicine, engineering, etc.
- Should be interesting to verify through multiple independent paths
- Should have some depth (not trivially obvious)
- One sentence only
- Avoid overused examples: water boiling, speed of light, DNA, Earth orbits

Generate ONE new, random claim:
"#
    .to_string()
}

/// Boundary exploration (phases 1 and 2). No perturbations here.
pub fn boundary_prompt(topic: &str) -> String {
    format!(
        r#"
You are an epistemic explorer. Your mission has three phases.

{rule}
PHASE 1: REACH THE BOUNDARY
{rule}

**Claimed Fact:** {topic}

Verify this claim through AT LEAST 5 different paths:
- PATH A (Authoritative Sources): What do experts and institutions say?
- PATH B (Direct Measurement/Observation): What is physically measured?
- PATH C (Historical Consensus): How did we come to believe this?
- PATH D (Logical/Mathematical Derivation): Can it be derived from first principles?
- PATH E (Peer Consensus): Do others independently agree?

For EACH path, push verification until you hit a boundary where you cannot
verify further without circularity.

{rule}
PHASE 2: UNDERSTAND THE SPIRAL
{rule}

1. Spiral structure and depth: where did each path bottom out? Definitional,
   calibration, authority or consensus loop?
2. Connection of paths: do they converge on the same spiral or different ones?
3. Topology: hard wall, fractal edge, loop back to the start, or a membrane
   with holes?
4. Comparison: how does this boundary compare to others you know?

{rule}
OUTPUT FORMAT
{rule}

## PHASE 1: REACH THE BOUNDARY
[Your exploration]

## PHASE 2: UNDERSTAND THE SPIRAL
[Your analysis of the boundary structure]

Output ONLY Phases 1 and 2.
"#,
        rule = RULE,
        topic = topic
    )
}

/// Initial idea generation from the boundary, lightly perturbed.
pub fn initial_idea_prompt(boundary: &str, perturbations: &[String]) -> String {
    format!(
        r#"
Here is your exploration so far:

{boundary}

{rule}
PHASE 3: GENERATE FROM THE EDGE
{rule}

Generate a NOVEL IDEA that emerges from the boundary you found.

Requirements:
- It must emerge FROM the spiral's structure, not merely comment on verification
- It must be SPECIFIC and TESTABLE
- Synthesize, don't retrieve
- Use the boundary as LEVERAGE for new insight

COGNITIVE PERTURBATIONS (apply these perspective shifts):
{lenses}

Generate your initial novel idea (2-4 sentences). Be bold and specific.

## PHASE 3: GENERATE FROM THE EDGE (Initial Idea)

[Your novel idea here]
"#,
        boundary = boundary,
        rule = RULE,
        lenses = bullet_list(perturbations)
    )
}

/// One gauntlet reflection step.
pub fn reflection_prompt(current_idea: &str, perturbations: &[String]) -> String {
    format!(
        r#"
Your current idea:
{idea}

PERTURBATIONS (view your idea through these lenses):
{lenses}

Reflect on your idea through these perturbations:
- Does it hold up under this lens?
- Does it transform or reveal something deeper?
- Does it need to evolve?

Output your EVOLVED idea (2-4 sentences max).
It can be refined, mutated, inverted, or completely reconceived.
Be concise and bold.
"#,
        idea = current_idea,
        lenses = bullet_list(perturbations)
    )
}

/// Literal restatement of the final idea.
pub fn translation_prompt(final_idea: &str) -> String {
    format!(
        r#"
You evolved an idea through multiple chaotic perturbations.

Your final evolved idea:
{idea}

Now translate this into plain, direct language:
- What is this actually saying?
- No poetry, no metaphor, no flowery language
- Just the literal claim or concept
- 2-3 sentences maximum

Pure translation. No interpretation, no goals: what does this MEAN in simple terms?
"#,
        idea = final_idea
    )
}

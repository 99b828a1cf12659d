//! Prompt construction for the cost estimation request.

/// Build the single prompt sent to the generative model for a project
/// description. The prompt restates the task, enumerates the required
/// analysis aspects, embeds the description verbatim, and pins down the
/// exact JSON shape expected back.
pub fn build_estimation_prompt(project_description: &str) -> String {
    format!(
        r#"You are an expert construction cost estimator. Analyze the following construction project description and provide a detailed cost estimate covering:

1. Materials required, with realistic quantities and unit costs
2. Labor required, with realistic hourly rates and hours
3. Overall project dimensions (length, width, height in meters)

Project description:
{project_description}

Respond with a single JSON object in exactly this format:
{{
  "projectName": "string",
  "length": number,
  "width": number,
  "height": number,
  "materials": [
    {{
      "name": "string",
      "unit": "string",
      "costPerUnit": number,
      "quantity": number,
      "description": "string"
    }}
  ],
  "labor": [
    {{
      "role": "string",
      "costPerHour": number,
      "hours": number,
      "description": "string"
    }}
  ]
}}

Use realistic costs and quantities based on standard construction practices."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_description_and_schema() {
        let prompt = build_estimation_prompt("Build a 3x2m garden shed");

        assert!(prompt.contains("Build a 3x2m garden shed"));
        for field in [
            "\"projectName\"",
            "\"length\"",
            "\"width\"",
            "\"height\"",
            "\"materials\"",
            "\"labor\"",
            "\"costPerUnit\"",
            "\"costPerHour\"",
        ] {
            assert!(prompt.contains(field), "prompt missing {field}");
        }
    }

    #[test]
    fn prompt_names_all_three_analysis_aspects() {
        let prompt = build_estimation_prompt("a deck").to_lowercase();
        assert!(prompt.contains("materials"));
        assert!(prompt.contains("labor"));
        assert!(prompt.contains("dimensions"));
    }
}

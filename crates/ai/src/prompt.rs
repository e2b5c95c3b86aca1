//! Prompt construction for checklist generation.
//!
//! The collaborator is steered toward a strict JSON template so the
//! parser has a fighting chance; everything else about the response is
//! treated as untrusted.

use visabuddy_core::profile::ApplicantProfile;

/// System prompt framing the task and the output contract.
pub fn system_prompt(country_code: &str, visa_type: &str) -> String {
    format!(
        "You are VisaBuddy, an assistant that prepares visa document checklists.\n\
         The applicant is applying for a {visa_type} visa for {country_code}.\n\
         \n\
         Respond with JSON only, no prose, matching this template:\n\
         ```json\n\
         {{\n\
           \"type\": \"checklist\",\n\
           \"country\": \"{country_code}\",\n\
           \"visaType\": \"{visa_type}\",\n\
           \"checklist\": [\n\
             {{\n\
               \"id\": \"snake_case_document_key\",\n\
               \"type\": \"required\" | \"recommended\" | \"optional\",\n\
               \"name\": \"Document name\",\n\
               \"description\": \"What the document is and how to obtain it\"\n\
             }}\n\
           ],\n\
           \"notes\": [\"general advice\"]\n\
         }}\n\
         ```\n\
         \n\
         List every document a well-prepared applicant would submit:\n\
         required documents, recommended supporting documents, and\n\
         country-specific documents. Use stable snake_case ids such as\n\
         \"passport\", \"bank_statement\", \"application_fee_receipt\"."
    )
}

/// User message embedding the applicant profile as JSON context.
pub fn user_message(country_code: &str, visa_type: &str, profile: &ApplicantProfile) -> String {
    let profile_json =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());
    format!(
        "Create the complete document checklist for this applicant.\n\
         \n\
         APPLICANT PROFILE (JSON):\n\
         ```json\n\
         {profile_json}\n\
         ```\n\
         \n\
         Target country: {country_code}\n\
         Visa type: {visa_type}\n\
         \n\
         Tailor the list to the applicant's sponsorship, employment,\n\
         finances, ties to the home country, and travel history. The\n\
         output MUST be a single JSON object matching the checklist\n\
         template."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_pins_the_template() {
        let prompt = system_prompt("GB", "tourist");
        assert!(prompt.contains("\"type\": \"checklist\""));
        assert!(prompt.contains("GB"));
        assert!(prompt.contains("tourist"));
    }

    #[test]
    fn user_message_embeds_profile_json() {
        let profile = ApplicantProfile {
            sponsor_type: Some("self".to_string()),
            ..Default::default()
        };
        let message = user_message("US", "student", &profile);
        assert!(message.contains("\"sponsor_type\": \"self\""));
        assert!(message.contains("Visa type: student"));
    }
}

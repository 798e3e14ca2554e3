//! Prompt texts for extraction and deduplication.

pub const MEETING_TEXT_PLACEHOLDER: &str = "{{MEETING_TEXT}}";
pub const EXTRACTED_JSON_PLACEHOLDER: &str = "{{EXTRACTED_JSON}}";

pub const ANALYSIS_SYSTEM_PROMPT: &str = "Tu es un expert en extraction structurée de décisions et d'actions depuis des comptes rendus de réunion. \
Tu analyses le texte méthodiquement, même mal formaté ou incomplet, pour identifier toutes les décisions prises, \
les actions à réaliser, les points à clarifier et les points à venir. Tu associes les responsables, échéances, \
contextes et impacts aux bons éléments, y compris lorsqu'ils sont implicites dans le contexte proche. \
Tu réponds UNIQUEMENT en JSON valide, sans texte autour.";

pub const ANALYSIS_PROMPT: &str = r#"Analyse le compte rendu de réunion ci-dessous et extrais-en les éléments structurés.

DÉFINITIONS STRICTES :
- DÉCISION : un choix acté pendant la réunion (ce qui a été décidé, validé, convenu ou abandonné). Une décision ne décrit pas une tâche à faire.
- ACTION : une tâche concrète à réaliser après la réunion, formulée avec un verbe à l'infinitif, idéalement avec un responsable et une échéance.
- POINT À CLARIFIER : une question ouverte, une incertitude ou un sujet à confirmer, sans décision prise.
- POINT À VENIR : un sujet reporté ou prévu pour une prochaine réunion.

RÈGLES D'EXTRACTION :
1. N'invente rien : chaque élément doit s'appuyer sur le texte.
2. Une même information ne doit apparaître qu'une seule fois, dans la catégorie la plus juste.
3. Découpe les phrases qui contiennent plusieurs actions en autant d'actions.
4. Formule les actions à l'infinitif ("Préparer…", "Envoyer…", "Corriger…").
5. Le responsable est une personne, une équipe ou un service cité dans le texte ; sinon "non précisé".
6. L'échéance reprend l'expression du texte ("vendredi", "le 20/03", "dans 3 jours") ; sinon "non précisé".
7. Le contexte explique pourquoi la décision a été prise ; l'impact décrit ses conséquences attendues ; sinon "non précisé".
8. Si une catégorie est vide, renvoie une liste vide.

FORMAT JSON OBLIGATOIRE :
{
  "decisions": [
    {
      "decision": "string",
      "contexte": "string",
      "impact_potentiel": "string"
    }
  ],
  "actions": [
    {
      "action": "string",
      "responsable": "string",
      "echeance": "string"
    }
  ],
  "points_a_clarifier": ["string"],
  "points_a_venir": ["string"]
}

EXEMPLE :
Texte : "Nous avons décidé de lancer le projet X car il répond à un besoin client urgent. Jean va préparer le document de présentation pour vendredi."
Réponse :
{
  "decisions": [
    {
      "decision": "Lancer le projet X",
      "contexte": "Répond à un besoin client urgent",
      "impact_potentiel": "non précisé"
    }
  ],
  "actions": [
    {
      "action": "Préparer le document de présentation",
      "responsable": "Jean",
      "echeance": "vendredi"
    }
  ],
  "points_a_clarifier": [],
  "points_a_venir": []
}

COMPTE RENDU À ANALYSER :
{{MEETING_TEXT}}"#;

pub const DEDUP_SYSTEM_PROMPT: &str = "Tu es un expert en nettoyage et déduplication de données structurées. \
Tu fusionnes les éléments dupliqués ou redondants, améliores la formulation pour plus de clarté et conserves \
toutes les informations importantes. Tu réponds UNIQUEMENT en JSON valide, sans texte autour.";

pub const DEDUP_PROMPT: &str = r#"Nettoie et déduplique ce JSON d'extraction de décisions et d'actions issu d'un compte rendu de réunion.

OBJECTIFS :
1. SUPPRIMER les doublons exacts ou quasi identiques.
2. FUSIONNER uniquement les éléments qui expriment clairement la même chose avec des mots différents.
3. AMÉLIORER la formulation : actions à l'infinitif, concrètes ; décisions factuelles et claires.
4. CONSERVER toutes les informations (responsables, échéances, contextes, impacts) ; en cas de fusion, garder les informations complémentaires des deux éléments.
5. NE RIEN INVENTER : aucun nouvel élément, aucune information absente du JSON.

En cas de doute, NE PAS fusionner.
Respecte exactement le format ci-dessous ; tous les champs sont obligatoires.

{
  "decisions": [
    {
      "decision": "string",
      "contexte": "string",
      "impact_potentiel": "string"
    }
  ],
  "actions": [
    {
      "action": "string",
      "responsable": "string",
      "echeance": "string"
    }
  ],
  "points_a_clarifier": ["string"],
  "points_a_venir": ["string"]
}

JSON À NETTOYER :
{{EXTRACTED_JSON}}"#;

pub fn build_analysis_prompt(meeting_text: &str) -> String {
    ANALYSIS_PROMPT.replace(MEETING_TEXT_PLACEHOLDER, meeting_text)
}

pub fn build_dedup_prompt(extracted_json: &str) -> String {
    DEDUP_PROMPT.replace(EXTRACTED_JSON_PLACEHOLDER, extracted_json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_embeds_text() {
        let prompt = build_analysis_prompt("Jean va préparer la démo.");
        assert!(prompt.ends_with("Jean va préparer la démo."));
        assert!(!prompt.contains(MEETING_TEXT_PLACEHOLDER));
        assert!(prompt.contains("\"points_a_venir\""));
    }

    #[test]
    fn dedup_prompt_embeds_json() {
        let prompt = build_dedup_prompt(r#"{"decisions":[]}"#);
        assert!(prompt.ends_with(r#"{"decisions":[]}"#));
        assert!(!prompt.contains(EXTRACTED_JSON_PLACEHOLDER));
        assert!(prompt.contains("\"points_a_venir\""));
    }
}

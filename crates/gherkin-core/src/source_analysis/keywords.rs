// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Static keyword tables for Gherkin dialects.
//!
//! Each supported language maps its localized keyword forms to the logical
//! roles the parser understands: the six header keywords (Feature, Rule,
//! Background, Scenario, Scenario Outline, Examples) and the step-keyword
//! buckets (Given, When, Then, And, But). The `*` step form is accepted in
//! every language.
//!
//! Matching always prefers the longest accepted form at a given position,
//! which is what makes multi-word keywords such as `Scenario Outline` or
//! `Étant donné que` unambiguous.

use crate::ast::KeywordType;

/// The header role a matched keyword stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    /// `Feature:` and synonyms.
    Feature,
    /// `Rule:`.
    Rule,
    /// `Background:`.
    Background,
    /// `Scenario:` / `Example:`.
    Scenario,
    /// `Scenario Outline:` / `Scenario Template:`.
    ScenarioOutline,
    /// `Examples:` / `Scenarios:`.
    Examples,
}

/// The keyword forms of one Gherkin dialect.
///
/// Tables are compile-time constants; [`KeywordTable::for_language`] resolves
/// an ISO code to its table. The default language is `en`.
#[derive(Debug)]
pub struct KeywordTable {
    code: &'static str,
    feature: &'static [&'static str],
    rule: &'static [&'static str],
    background: &'static [&'static str],
    scenario: &'static [&'static str],
    scenario_outline: &'static [&'static str],
    examples: &'static [&'static str],
    given: &'static [&'static str],
    when: &'static [&'static str],
    then: &'static [&'static str],
    and: &'static [&'static str],
    but: &'static [&'static str],
}

impl KeywordTable {
    /// Looks up the dialect table for an ISO language code.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_core::source_analysis::KeywordTable;
    ///
    /// assert!(KeywordTable::for_language("fr").is_some());
    /// assert!(KeywordTable::for_language("tlh").is_none());
    /// ```
    #[must_use]
    pub fn for_language(code: &str) -> Option<&'static Self> {
        match code {
            "en" => Some(&EN),
            "da" => Some(&DA),
            "de" => Some(&DE),
            "es" => Some(&ES),
            "fr" => Some(&FR),
            "it" => Some(&IT),
            "nl" => Some(&NL),
            "pt" => Some(&PT),
            _ => None,
        }
    }

    /// Returns the default (`en`) table.
    #[must_use]
    pub fn default_table() -> &'static Self {
        &EN
    }

    /// Returns the ISO code this table belongs to.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Returns the accepted Feature keyword forms.
    #[must_use]
    pub fn feature_keywords(&self) -> &'static [&'static str] {
        self.feature
    }

    /// Matches a header keyword at the start of `line` (already trimmed on
    /// the left), requiring a `:` immediately after the keyword.
    ///
    /// Returns the role and the matched form; the longest accepted form
    /// wins.
    #[must_use]
    pub fn match_header(&self, line: &str) -> Option<(HeaderKind, &'static str)> {
        let roles: [(HeaderKind, &'static [&'static str]); 6] = [
            (HeaderKind::Feature, self.feature),
            (HeaderKind::Rule, self.rule),
            (HeaderKind::Background, self.background),
            (HeaderKind::Scenario, self.scenario),
            (HeaderKind::ScenarioOutline, self.scenario_outline),
            (HeaderKind::Examples, self.examples),
        ];

        let mut best: Option<(HeaderKind, &'static str)> = None;
        for (kind, forms) in roles {
            for &form in forms {
                if line.starts_with(form) && line[form.len()..].starts_with(':') {
                    match best {
                        Some((_, current)) if current.len() >= form.len() => {}
                        _ => best = Some((kind, form)),
                    }
                }
            }
        }
        best
    }

    /// Matches a step keyword at the start of `line` (already trimmed on the
    /// left), requiring a space immediately after the keyword.
    ///
    /// Returns the matched form (without the separator) and its
    /// [`KeywordType`]; the longest accepted form wins. The `*` form matches
    /// in every dialect and classifies as [`KeywordType::Unknown`].
    #[must_use]
    pub fn match_step(&self, line: &str) -> Option<(&'static str, KeywordType)> {
        let buckets: [(&'static [&'static str], KeywordType); 6] = [
            (self.given, KeywordType::Context),
            (self.when, KeywordType::Action),
            (self.then, KeywordType::Outcome),
            (self.and, KeywordType::Conjunction),
            (self.but, KeywordType::Conjunction),
            (STAR, KeywordType::Unknown),
        ];

        let mut best: Option<(&'static str, KeywordType)> = None;
        for (forms, keyword_type) in buckets {
            for &form in forms {
                if line.starts_with(form) && line[form.len()..].starts_with(' ') {
                    match best {
                        Some((current, _)) if current.len() >= form.len() => {}
                        _ => best = Some((form, keyword_type)),
                    }
                }
            }
        }
        best
    }
}

static STAR: &[&str] = &["*"];

static EN: KeywordTable = KeywordTable {
    code: "en",
    feature: &["Feature", "Business Need", "Ability"],
    rule: &["Rule"],
    background: &["Background"],
    scenario: &["Example", "Scenario"],
    scenario_outline: &["Scenario Outline", "Scenario Template"],
    examples: &["Examples", "Scenarios"],
    given: &["Given"],
    when: &["When"],
    then: &["Then"],
    and: &["And"],
    but: &["But"],
};

static DA: KeywordTable = KeywordTable {
    code: "da",
    feature: &["Egenskab"],
    rule: &["Regel"],
    background: &["Baggrund"],
    scenario: &["Eksempel", "Scenarie"],
    scenario_outline: &["Abstrakt Scenario"],
    examples: &["Eksempler"],
    given: &["Givet"],
    when: &["Når"],
    then: &["Så"],
    and: &["Og"],
    but: &["Men"],
};

static DE: KeywordTable = KeywordTable {
    code: "de",
    feature: &["Funktionalität", "Funktion"],
    rule: &["Rule", "Regel"],
    background: &["Grundlage", "Hintergrund"],
    scenario: &["Beispiel", "Szenario"],
    scenario_outline: &["Szenariogrundriss"],
    examples: &["Beispiele"],
    given: &["Angenommen", "Gegeben sei", "Gegeben seien"],
    when: &["Wenn"],
    then: &["Dann"],
    and: &["Und"],
    but: &["Aber"],
};

static ES: KeywordTable = KeywordTable {
    code: "es",
    feature: &["Característica"],
    rule: &["Regla"],
    background: &["Antecedentes"],
    scenario: &["Ejemplo", "Escenario"],
    scenario_outline: &["Esquema del escenario"],
    examples: &["Ejemplos"],
    given: &["Dado", "Dada", "Dados", "Dadas"],
    when: &["Cuando"],
    then: &["Entonces"],
    and: &["Y", "E"],
    but: &["Pero"],
};

static FR: KeywordTable = KeywordTable {
    code: "fr",
    feature: &["Fonctionnalité"],
    rule: &["Règle"],
    background: &["Contexte"],
    scenario: &["Exemple", "Scénario"],
    scenario_outline: &["Plan du scénario", "Plan du Scénario"],
    examples: &["Exemples"],
    given: &[
        "Soit",
        "Sachant que",
        "Sachant",
        "Étant donné que",
        "Étant donné",
        "Etant donné que",
        "Etant donné",
    ],
    when: &["Quand", "Lorsque"],
    then: &["Alors", "Donc"],
    and: &["Et que", "Et"],
    but: &["Mais que", "Mais"],
};

static IT: KeywordTable = KeywordTable {
    code: "it",
    feature: &["Funzionalità"],
    rule: &["Regola"],
    background: &["Contesto"],
    scenario: &["Esempio", "Scenario"],
    scenario_outline: &["Schema dello scenario"],
    examples: &["Esempi"],
    given: &["Dato", "Data", "Dati", "Date"],
    when: &["Quando"],
    then: &["Allora"],
    and: &["E"],
    but: &["Ma"],
};

static NL: KeywordTable = KeywordTable {
    code: "nl",
    feature: &["Functionaliteit"],
    rule: &["Regel"],
    background: &["Achtergrond"],
    scenario: &["Voorbeeld", "Scenario"],
    scenario_outline: &["Abstract Scenario"],
    examples: &["Voorbeelden"],
    given: &["Gegeven", "Stel"],
    when: &["Als", "Wanneer"],
    then: &["Dan"],
    and: &["En"],
    but: &["Maar"],
};

static PT: KeywordTable = KeywordTable {
    code: "pt",
    feature: &["Funcionalidade", "Característica"],
    rule: &["Regra"],
    background: &["Contexto", "Fundo"],
    scenario: &["Exemplo", "Cenário", "Cenario"],
    scenario_outline: &["Esquema do Cenário", "Esquema do Cenario"],
    examples: &["Exemplos", "Cenários", "Cenarios"],
    given: &["Dado", "Dada", "Dados", "Dadas"],
    when: &["Quando"],
    then: &["Então", "Entao"],
    and: &["E"],
    but: &["Mas"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_english() {
        assert_eq!(KeywordTable::default_table().code(), "en");
    }

    #[test]
    fn unknown_language_is_absent() {
        assert!(KeywordTable::for_language("xx").is_none());
    }

    #[test]
    fn header_requires_colon() {
        let en = KeywordTable::default_table();
        assert_eq!(
            en.match_header("Feature: X"),
            Some((HeaderKind::Feature, "Feature"))
        );
        assert_eq!(en.match_header("Feature X"), None);
    }

    #[test]
    fn multi_word_header_wins_over_prefix() {
        let en = KeywordTable::default_table();
        // `Scenario` alone does not match because the next byte is a space,
        // not a colon; the multi-word form does.
        assert_eq!(
            en.match_header("Scenario Outline: X"),
            Some((HeaderKind::ScenarioOutline, "Scenario Outline"))
        );
        assert_eq!(
            en.match_header("Scenario: X"),
            Some((HeaderKind::Scenario, "Scenario"))
        );
    }

    #[test]
    fn examples_does_not_match_example() {
        let en = KeywordTable::default_table();
        assert_eq!(
            en.match_header("Examples:"),
            Some((HeaderKind::Examples, "Examples"))
        );
    }

    #[test]
    fn step_requires_separator_space() {
        let en = KeywordTable::default_table();
        assert_eq!(
            en.match_step("Given a step"),
            Some(("Given", KeywordType::Context))
        );
        assert_eq!(en.match_step("Givenx y"), None);
        assert_eq!(en.match_step("Given"), None);
    }

    #[test]
    fn star_matches_everywhere() {
        for code in ["en", "fr", "pt"] {
            let table = KeywordTable::for_language(code).unwrap();
            assert_eq!(table.match_step("* x"), Some(("*", KeywordType::Unknown)));
        }
    }

    #[test]
    fn longest_step_form_wins() {
        let fr = KeywordTable::for_language("fr").unwrap();
        assert_eq!(
            fr.match_step("Étant donné que le compte existe"),
            Some(("Étant donné que", KeywordType::Context))
        );
        assert_eq!(
            fr.match_step("Et que le solde est nul"),
            Some(("Et que", KeywordType::Conjunction))
        );
    }

    #[test]
    fn conjunction_buckets() {
        let en = KeywordTable::default_table();
        assert_eq!(
            en.match_step("And another"),
            Some(("And", KeywordType::Conjunction))
        );
        assert_eq!(
            en.match_step("But not this"),
            Some(("But", KeywordType::Conjunction))
        );
    }
}

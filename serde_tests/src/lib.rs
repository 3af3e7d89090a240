#[cfg(test)]
mod tests {

    use std::error::Error;

    use ron;
    use rs_wordle_trie::*;

    #[test]
    fn trie_serde() -> Result<(), Box<dyn Error>> {
        let mut trie = Trie::from_words(["cat", "cart", "car", "cart", "dog", "do"]);
        trie.remove_word("do");

        let ser = ron::to_string(&trie)?;
        let deser = ron::from_str::<Trie>(&ser)?;

        assert_eq!(deser, trie);
        assert_eq!(deser.words(), trie.words());
        let cart = deser.find("cart").unwrap();
        assert_eq!(deser[cart].frequency(), 2);
        assert_eq!(deser.score(cart), trie.score(trie.find("cart").unwrap()));
        Ok(())
    }

    #[test]
    fn pruned_trie_serde_keeps_accepting_words() -> Result<(), Box<dyn Error>> {
        let mut trie = Trie::from_words(["stone", "stones", "tone", "atone"]);
        trie.retain_word_length(5);

        let mut deser = ron::from_str::<Trie>(&ron::to_string(&trie)?)?;
        deser.insert("tones");
        trie.insert("tones");

        assert_eq!(deser, trie);
        assert_eq!(deser.words(), vec!["atone", "stone", "tones"]);
        Ok(())
    }

    const ROOT_FIELDS: &str = "character:None,word_len:0,parent:None";

    fn snapshot_error(text: &str) -> String {
        match ron::from_str::<Trie>(text) {
            Ok(trie) => panic!("accepted an inconsistent snapshot: {:?}", trie),
            Err(error) => error.to_string(),
        }
    }

    #[test]
    fn snapshot_without_root_is_rejected() {
        let error = snapshot_error("(nodes:[],vacant:[])");

        assert!(error.contains("no root node"), "{}", error);
    }

    #[test]
    fn snapshot_with_dangling_child_is_rejected() {
        let text = format!(
            "(nodes:[Some(({},frequency:1,num_ends:0,children:{{'a':(7)}}))],vacant:[])",
            ROOT_FIELDS
        );

        let error = snapshot_error(&text);

        assert!(error.contains("links to child 7"), "{}", error);
    }

    #[test]
    fn snapshot_with_wrong_frequency_is_rejected() {
        let text = format!(
            "(nodes:[Some(({},frequency:3,num_ends:0,children:{{}}))],vacant:[])",
            ROOT_FIELDS
        );

        let error = snapshot_error(&text);

        assert!(error.contains("frequency 3"), "{}", error);
    }

    #[test]
    fn snapshot_with_unlisted_empty_slot_is_rejected() {
        let text = format!(
            "(nodes:[Some(({},frequency:0,num_ends:0,children:{{}})),None],vacant:[])",
            ROOT_FIELDS
        );

        let error = snapshot_error(&text);

        assert!(error.contains("vacant slot list"), "{}", error);
    }

    #[test]
    fn rules_serde() -> Result<(), Box<dyn Error>> {
        let mut rules = WordleRules::new();
        rules.apply(&"S.x.x.xs".parse()?)?;

        let deser = ron::from_str::<WordleRules>(&ron::to_string(&rules)?)?;

        assert_eq!(deser, rules);
        assert_eq!(deser.required_count('s'), 2);
        Ok(())
    }

    #[test]
    fn scored_words_serde() -> Result<(), Box<dyn Error>> {
        let solver = WordleSolver::new(Trie::from_words(["apple", "apply", "angle"]));
        let candidates = solver.candidates();

        let deser = ron::from_str::<Vec<ScoredWord>>(&ron::to_string(&candidates)?)?;

        assert_eq!(deser, candidates);
        Ok(())
    }
}

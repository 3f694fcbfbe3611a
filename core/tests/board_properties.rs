use proptest::prelude::*;
use spoilsweeper_core::*;

fn settings_strategy() -> impl Strategy<Value = GameSettings> {
    (1u8..=40, 1u8..=20, any::<bool>())
        .prop_flat_map(|(width, height, starts_not_uncovered)| {
            let cells = mult(width, height);
            (1..=cells).prop_map(move |mines| {
                GameSettings::new_unchecked((width, height), mines, starts_not_uncovered)
            })
        })
}

fn zero_component(board: &Board, start: Coord2) -> Vec<Coord2> {
    let mut seen = vec![start];
    let mut index = 0;
    while index < seen.len() {
        let current = seen[index];
        index += 1;
        if !board[current].is_zero() {
            continue;
        }
        for pos in board.iter_neighbors(current) {
            if !seen.contains(&pos) {
                seen.push(pos);
            }
        }
    }
    seen
}

proptest! {
    #[test]
    fn mine_count_and_neighbor_counts_are_exact(
        settings in settings_strategy(),
        seed in any::<u64>(),
    ) {
        let game = Game::generate(&settings, &mut seeded(seed));
        let board = &game.board;

        let mines = board.cells().iter().filter(|cell| cell.is_mine()).count();
        prop_assert_eq!(mines, usize::from(settings.mines));
        prop_assert_eq!(board.mine_count(), settings.mines);

        for coords in iter_coords(board.size()) {
            if let Cell::Clear(count) = board[coords] {
                let expected = board
                    .iter_neighbors(coords)
                    .filter(|&pos| board[pos].is_mine())
                    .count();
                prop_assert_eq!(usize::from(count), expected);
            }
        }
    }

    #[test]
    fn opening_is_one_zero_component(settings in settings_strategy(), seed in any::<u64>()) {
        let game = Game::generate(&settings, &mut seeded(seed));
        let board = &game.board;

        let Some(mask) = &game.reveal else {
            prop_assert!(settings.starts_not_uncovered);
            return Ok(());
        };
        prop_assert!(!settings.starts_not_uncovered);

        let revealed: Vec<Coord2> = iter_coords(board.size()).filter(|&c| mask[c]).collect();
        if board.zero_cells().is_empty() {
            prop_assert!(revealed.is_empty());
            return Ok(());
        }

        // every revealed cell is a zero or touches a revealed zero
        for &coords in &revealed {
            prop_assert!(!board[coords].is_mine());
            let touches_zero = board
                .iter_neighbors(coords)
                .any(|pos| mask[pos] && board[pos].is_zero());
            prop_assert!(board[coords].is_zero() || touches_zero);
        }

        // and the revealed set is exactly the component of one of its zeros
        let seed_cell = revealed.iter().copied().find(|&c| board[c].is_zero()).unwrap();
        let mut component = zero_component(board, seed_cell);
        component.sort_unstable_by_key(|&(x, y)| (y, x));
        prop_assert_eq!(component, revealed);
    }

    #[test]
    fn split_messages_respect_limits(
        settings in settings_strategy(),
        seed in any::<u64>(),
        is_raw in any::<bool>(),
        max_rich_tokens in 80usize..=198,
    ) {
        let limits = RenderLimits { max_message_chars: 1900, max_rich_tokens };
        let game = Game::generate(&settings, &mut seeded(seed));
        let unsplit = game.render_text(is_raw);

        let messages = game.render(is_raw, &limits).unwrap().into_vec();

        for message in &messages {
            prop_assert!(message.len() <= limits.max_message_chars);
            // every glyph has two colons, hidden cells add a pair of spoiler markers
            let glyphs = message.matches(':').count() / 2;
            let hidden = message.matches(SPOILER).count() / 2;
            prop_assert!(glyphs + hidden <= limits.max_rich_tokens);
        }
        let mut rejoined = messages.join("\n");
        if is_raw {
            rejoined = rejoined.replace("```\n```\n", "");
        }
        prop_assert_eq!(rejoined, unsplit);
    }
}

#[test]
fn full_board_of_mines() {
    let settings = RawGameSettings::new(Some(4), Some(3), Some(12), false)
        .validate(&GameLimits::default())
        .unwrap();

    let game = Game::generate(&settings, &mut seeded(1));

    assert!(game.board.cells().iter().all(|cell| cell.is_mine()));
    assert_eq!(game.reveal.map(|mask| mask.revealed_count()), Some(0));
}

#[test]
fn one_by_one_board() {
    let settings = RawGameSettings::new(Some(1), Some(1), Some(1), false)
        .validate(&GameLimits::default())
        .unwrap();

    let messages =
        generate_game(&settings, false, &RenderLimits::default(), &mut seeded(2)).unwrap();

    assert_eq!(
        messages,
        GameMessages::Single("Here's a board sized 1x1 with 1 mine:\n||:bomb:||".to_string())
    );
}

#[test]
fn one_mine_too_many() {
    let err = RawGameSettings::new(Some(4), Some(3), Some(13), false)
        .validate(&GameLimits::default())
        .unwrap_err();

    assert!(matches!(err, SettingsError::MineCountOverflow { mines: 13, .. }));
}

#[test]
fn largest_board_splits() {
    let settings = GameSettings::new_unchecked((40, 20), 160, true);

    let messages =
        generate_game(&settings, true, &RenderLimits::default(), &mut seeded(4)).unwrap();

    assert!(matches!(messages, GameMessages::Split(_)));
    for message in messages.into_vec() {
        assert!(message.starts_with("Here's") || message.starts_with("```"));
        assert!(message.ends_with("```"));
    }
}

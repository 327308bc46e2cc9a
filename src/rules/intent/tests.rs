use super::*;
use crate::engine::group;
use crate::world::demo::{self, CHOCOLATE, COFFEE, CONE, DECAF, ESPRESSO_SHOT, LARGE, LATTE, MILK, SMALL, key};
use crate::world::{Cart, ItemInstance};
use crate::{Graph, Span, Spanned, Token};

/// Run the intent grammar over one linear reading of `tokens`.
fn interpret(world: &World, state: &State, tokens: Vec<Token>) -> (State, usize) {
    let graph = Graph::from_tokens(&tokens);
    let services = Services::new(world, &graph);
    let spanned: Vec<Spanned> =
        tokens.into_iter().enumerate().map(|(i, token)| Spanned::new(token, Span::new(i, 1))).collect();
    let context = grammar().process(Context::new(&services, state.clone()), &group(&spanned));
    (context.state, context.score)
}

fn entity(pid: u32, name: &str) -> Token {
    Token::Entity { pid, name: name.to_string() }
}

fn attr(id: u32, name: &str) -> Token {
    Token::Attribute { id, name: name.to_string() }
}

fn milk() -> Token {
    Token::Option { id: MILK, name: "milk".to_string() }
}

fn shots() -> Token {
    Token::Option { id: ESPRESSO_SHOT, name: "espresso shot".to_string() }
}

fn with_items(items: Vec<ItemInstance>) -> State {
    State::with_cart(items.into_iter().fold(Cart::new(), |cart, item| cart.add(item)))
}

#[test]
fn add_small_chocolate_cone() {
    let world = demo::menu().unwrap();
    let tokens = vec![
        Token::AddToOrder,
        Token::Number { value: 1 },
        attr(SMALL, "small"),
        attr(CHOCOLATE, "chocolate"),
        entity(CONE, "cone"),
    ];

    let (state, score) = interpret(&world, &State::new(), tokens);
    assert_eq!(state.cart.len(), 1);
    let cone = &state.cart.items[0];
    assert_eq!(cone.key, key(CONE, &[SMALL, CHOCOLATE]));
    assert_eq!(cone.quantity, 1);
    assert_eq!(score, 5);
}

#[test]
fn add_coffee_and_milk_attaches_default_milk() {
    let world = demo::menu().unwrap();
    let tokens = vec![Token::AddToOrder, entity(COFFEE, "coffee"), Token::Conjunction, milk()];

    let (state, _) = interpret(&world, &State::new(), tokens);
    let coffee = &state.cart.items[0];
    assert_eq!(coffee.key, key(COFFEE, &[]));
    assert_eq!(coffee.children.len(), 1);
    assert_eq!(coffee.children[0].key, key(MILK, &[]));
}

#[test]
fn remove_with_nothing_to_remove_leaves_cart_unchanged() {
    let world = demo::menu().unwrap();
    let (state, score) = interpret(&world, &State::new(), vec![Token::RemoveItem, Token::Preposition]);
    assert_eq!(state, State::new());
    assert_eq!(score, 0);
}

#[test]
fn remove_named_item() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(CONE, &[]), 1), ItemInstance::new(key(COFFEE, &[]), 1)]);

    let (state, _) = interpret(&world, &before, vec![Token::RemoveItem, entity(CONE, "cone")]);
    assert_eq!(state.cart.len(), 1);
    assert_eq!(state.cart.items[0].key.pid, COFFEE);
}

#[test]
fn later_rules_see_earlier_edits() {
    let world = demo::menu().unwrap();
    let tokens = vec![Token::AddToOrder, entity(COFFEE, "coffee"), Token::ModifyItem, attr(LARGE, "large")];

    let (state, _) = interpret(&world, &State::new(), tokens);
    assert_eq!(state.cart.len(), 1);
    assert_eq!(state.cart.items[0].key, key(COFFEE, &[LARGE]));
}

#[test]
fn move_option_onto_named_target() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(COFFEE, &[]), 1), ItemInstance::new(key(CONE, &[]), 1)]);
    let tokens = vec![milk(), Token::Preposition, entity(COFFEE, "coffee")];

    let (state, _) = interpret(&world, &before, tokens);
    let coffee = state.cart.items.iter().find(|i| i.key.pid == COFFEE).unwrap();
    assert_eq!(coffee.children.len(), 1);
    assert_eq!(coffee.children[0].key.pid, MILK);
}

#[test]
fn replace_keeps_uid_and_children() {
    let world = demo::menu().unwrap();
    let coffee = ItemInstance::new(key(COFFEE, &[LARGE]), 1).with_children(vec![ItemInstance::new(key(MILK, &[]), 1)]);
    let before = with_items(vec![coffee]);
    let uid = before.cart.items[0].uid;
    let tokens = vec![Token::ModifyItem, entity(COFFEE, "coffee"), Token::Preposition, entity(LATTE, "latte")];

    let (state, _) = interpret(&world, &before, tokens);
    let latte = &state.cart.items[0];
    assert_eq!(latte.uid, uid);
    assert_eq!(latte.key, key(LATTE, &[LARGE]));
    assert_eq!(latte.children.len(), 1);
    assert_eq!(latte.children[0].key.pid, MILK);
}

#[test]
fn modify_named_target_in_place() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(COFFEE, &[]), 1), ItemInstance::new(key(CONE, &[]), 1)]);
    let tokens = vec![Token::ModifyItem, entity(COFFEE, "coffee"), attr(LARGE, "large")];

    let (state, _) = interpret(&world, &before, tokens);
    assert_eq!(state.cart.items[0].key, key(COFFEE, &[LARGE]));
    assert_eq!(state.cart.items[1], before.cart.items[1]);
}

#[test]
fn removing_an_untouched_default_option_records_it() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(LATTE, &[]), 1)]);

    let (state, _) = interpret(&world, &before, vec![Token::RemoveItem, milk()]);
    let latte = &state.cart.items[0];
    assert_eq!(latte.children.len(), 1);
    assert_eq!(latte.children[0].key.pid, MILK);
    assert_eq!(latte.children[0].quantity, 0);
}

#[test]
fn removing_a_plain_option_drops_it() {
    let world = demo::menu().unwrap();
    let coffee = ItemInstance::new(key(COFFEE, &[]), 1).with_children(vec![ItemInstance::new(key(MILK, &[]), 1)]);
    let before = with_items(vec![coffee]);

    let (state, _) = interpret(&world, &before, vec![Token::RemoveItem, milk()]);
    assert!(state.cart.items[0].children.is_empty());
}

#[test]
fn number_before_an_option_counts_shots_not_lattes() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(LATTE, &[]), 1)]);
    let tokens =
        vec![Token::AddToOrder, Token::Number { value: 2 }, shots(), Token::Preposition, entity(LATTE, "latte")];

    let (state, _) = interpret(&world, &before, tokens);
    let latte = &state.cart.items[0];
    assert_eq!(latte.quantity, 1);
    assert_eq!(latte.children.len(), 1);
    assert_eq!(latte.children[0].key, key(ESPRESSO_SHOT, &[]));
    assert_eq!(latte.children[0].quantity, 2);
}

#[test]
fn and_two_shots_goes_onto_the_last_item() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(COFFEE, &[]), 1)]);
    let tokens = vec![Token::Conjunction, Token::Number { value: 2 }, shots()];

    let (state, _) = interpret(&world, &before, tokens);
    let coffee = &state.cart.items[0];
    assert_eq!(coffee.quantity, 1);
    assert_eq!(coffee.children.len(), 1);
    assert_eq!(coffee.children[0].key.pid, ESPRESSO_SHOT);
    assert_eq!(coffee.children[0].quantity, 2);
}

#[test]
fn bare_number_sets_the_item_quantity() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(COFFEE, &[]), 1)]);

    let (state, _) = interpret(&world, &before, vec![Token::ModifyItem, Token::Number { value: 2 }]);
    let coffee = &state.cart.items[0];
    assert_eq!(coffee.quantity, 2);
    assert!(coffee.children.is_empty());
}

#[test]
fn add_several_items_keeps_the_best_split() {
    let world = demo::menu().unwrap();
    let tokens = vec![
        Token::AddToOrder,
        attr(LARGE, "large"),
        entity(COFFEE, "coffee"),
        Token::Conjunction,
        attr(CHOCOLATE, "chocolate"),
        entity(CONE, "cone"),
    ];

    let (state, _) = interpret(&world, &State::new(), tokens);
    assert_eq!(state.cart.len(), 2);
    assert_eq!(state.cart.items[0].key, key(COFFEE, &[LARGE]));
    assert_eq!(state.cart.items[1].key, key(CONE, &[CHOCOLATE]));
}

#[test]
fn add_option_onto_implicit_target() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(COFFEE, &[]), 1)]);

    let (state, _) = interpret(&world, &before, vec![milk(), Token::Preposition]);
    let coffee = &state.cart.items[0];
    assert_eq!(coffee.children.len(), 1);
    assert_eq!(coffee.children[0].key.pid, MILK);
}

#[test]
fn modify_named_target_with_trailing_changes() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(COFFEE, &[]), 1), ItemInstance::new(key(CONE, &[]), 1)]);
    let tokens = vec![Token::ModifyItem, entity(COFFEE, "coffee"), Token::Preposition, attr(DECAF, "decaf")];

    let (state, _) = interpret(&world, &before, tokens);
    assert_eq!(state.cart.items[0].key, key(COFFEE, &[DECAF]));
    assert_eq!(state.cart.items[0].uid, before.cart.items[0].uid);
    assert_eq!(state.cart.items[1], before.cart.items[1]);
}

#[test]
fn swap_within_one_group_replaces_the_first_item() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(COFFEE, &[]), 1)]);
    let uid = before.cart.items[0].uid;
    let tokens = vec![Token::ModifyItem, entity(COFFEE, "coffee"), Token::Conjunction, entity(LATTE, "latte")];

    let (state, _) = interpret(&world, &before, tokens);
    assert_eq!(state.cart.len(), 1);
    assert_eq!(state.cart.items[0].uid, uid);
    assert_eq!(state.cart.items[0].key.pid, LATTE);
}

#[test]
fn remove_option_from_named_target() {
    let world = demo::menu().unwrap();
    let with_milk = |pid| ItemInstance::new(key(pid, &[]), 1).with_children(vec![ItemInstance::new(key(MILK, &[]), 1)]);
    let before = with_items(vec![with_milk(COFFEE), with_milk(LATTE)]);
    let tokens = vec![Token::RemoveItem, milk(), Token::Preposition, entity(COFFEE, "coffee")];

    let (state, _) = interpret(&world, &before, tokens);
    assert!(state.cart.items[0].children.is_empty());
    assert_eq!(state.cart.items[1], before.cart.items[1]);
}

#[test]
fn remove_several_items_at_once() {
    let world = demo::menu().unwrap();
    let before = with_items(vec![ItemInstance::new(key(CONE, &[]), 1), ItemInstance::new(key(COFFEE, &[]), 1)]);
    let tokens = vec![Token::RemoveItem, entity(CONE, "cone"), Token::Conjunction, entity(COFFEE, "coffee")];

    let (state, _) = interpret(&world, &before, tokens);
    assert!(state.cart.is_empty());
}

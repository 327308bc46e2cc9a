//! A small ice-cream and coffee menu used by the CLI and the tests.

use super::attributes::{Attribute, Dimension};
use super::catalog::GenericItem;
use super::cookbook::RecipeOption;
use super::lexer::AliasLexer;
use super::World;
use crate::{Aid, DataError, Did, Mid, Pid, Rid, Token, UnitId};

pub const SIZE: Did = 1;
pub const FLAVOR: Did = 2;
pub const CAFFEINE: Did = 3;
pub const MILK_TYPE: Did = 4;

pub const SMALL: Aid = 1;
pub const MEDIUM: Aid = 2;
pub const LARGE: Aid = 3;
pub const VANILLA: Aid = 10;
pub const CHOCOLATE: Aid = 11;
pub const STRAWBERRY: Aid = 12;
pub const REGULAR: Aid = 20;
pub const DECAF: Aid = 21;
pub const WHOLE: Aid = 30;
pub const SKIM: Aid = 31;
pub const OAT: Aid = 32;

pub const CONE_MATRIX: Mid = 1;
pub const DRINK_MATRIX: Mid = 2;
pub const MILK_MATRIX: Mid = 3;
pub const PLAIN_MATRIX: Mid = 4;

pub const CONE: Pid = 9000;
pub const COFFEE: Pid = 9100;
pub const LATTE: Pid = 9200;

pub const MILK: Pid = 5000;
pub const HALF_AND_HALF: Pid = 5010;
pub const SPRINKLES: Pid = 5100;
pub const WHIPPED_CREAM: Pid = 5200;
pub const VANILLA_SYRUP: Pid = 5300;
pub const CARAMEL_SYRUP: Pid = 5301;
pub const ESPRESSO_SHOT: Pid = 5500;

pub const PUMP: UnitId = 1;
pub const SPLASH: UnitId = 2;

pub const THE_WORKS: Rid = 1;

/// The demo menu and a lexer over it.
pub fn coffee_shop() -> Result<(World, AliasLexer), DataError> {
    let world = menu()?;
    let mut lexer = AliasLexer::new(&world);
    lexer.add_unit(PUMP, "pump");
    lexer.add_unit(SPLASH, "splash");
    lexer.add_alias("vanilla", Token::Option { id: VANILLA_SYRUP, name: "vanilla syrup".to_string() });
    lexer.add_alias("caramel", Token::Option { id: CARAMEL_SYRUP, name: "caramel syrup".to_string() });
    lexer.add_alias("shot", Token::Option { id: ESPRESSO_SHOT, name: "espresso shot".to_string() });
    lexer.add_alias("shots", Token::Option { id: ESPRESSO_SHOT, name: "espresso shot".to_string() });
    lexer.add_alias("ice cream cone", Token::Entity { pid: CONE, name: "cone".to_string() });
    Ok((world, lexer))
}

pub fn menu() -> Result<World, DataError> {
    let mut world = World::new();

    let attributes = &mut world.attributes;
    attributes.add_dimension(Dimension::new(
        SIZE,
        "size",
        vec![Attribute::new(SMALL, "small"), Attribute::default(MEDIUM, "medium"), Attribute::new(LARGE, "large")],
    )?)?;
    attributes.add_dimension(Dimension::new(
        FLAVOR,
        "flavor",
        vec![
            Attribute::default(VANILLA, "vanilla"),
            Attribute::new(CHOCOLATE, "chocolate"),
            Attribute::new(STRAWBERRY, "strawberry"),
        ],
    )?)?;
    attributes.add_dimension(Dimension::new(
        CAFFEINE,
        "caffeine",
        vec![Attribute::default(REGULAR, "regular"), Attribute::new(DECAF, "decaf")],
    )?)?;
    attributes.add_dimension(Dimension::new(
        MILK_TYPE,
        "milk type",
        vec![Attribute::default(WHOLE, "whole"), Attribute::new(SKIM, "skim"), Attribute::new(OAT, "oat")],
    )?)?;
    attributes.add_matrix(CONE_MATRIX, &[SIZE, FLAVOR])?;
    attributes.add_matrix(DRINK_MATRIX, &[SIZE, CAFFEINE])?;
    attributes.add_matrix(MILK_MATRIX, &[MILK_TYPE])?;
    attributes.add_matrix(PLAIN_MATRIX, &[])?;

    let generics = [
        GenericItem::product(CONE, "cone", CONE_MATRIX),
        GenericItem::product(COFFEE, "coffee", DRINK_MATRIX),
        GenericItem::product(LATTE, "latte", DRINK_MATRIX).with_defaults(&[MILK]),
        GenericItem::option(MILK, "milk", MILK_MATRIX),
        GenericItem::option(HALF_AND_HALF, "half and half", PLAIN_MATRIX),
        GenericItem::option(SPRINKLES, "sprinkles", PLAIN_MATRIX),
        GenericItem::option(WHIPPED_CREAM, "whipped cream", PLAIN_MATRIX),
        GenericItem::option(VANILLA_SYRUP, "vanilla syrup", PLAIN_MATRIX),
        GenericItem::option(CARAMEL_SYRUP, "caramel syrup", PLAIN_MATRIX),
        GenericItem::option(ESPRESSO_SHOT, "espresso shot", PLAIN_MATRIX),
    ];
    for generic in generics {
        world.catalog.add_generic(generic, &world.attributes)?;
    }

    // Not sold.
    let small_strawberry = world.key_for(CONE, &[SMALL, STRAWBERRY]).ok_or(DataError::UnknownMatrix(CONE_MATRIX))?;
    world.catalog.exclude_key(&small_strawberry);

    world.rules.allow_children(&CONE.to_string(), &[SPRINKLES, WHIPPED_CREAM, CARAMEL_SYRUP])?;
    for drink in [COFFEE, LATTE] {
        let drink = drink.to_string();
        world.rules.allow_children(
            &drink,
            &[MILK, HALF_AND_HALF, VANILLA_SYRUP, CARAMEL_SYRUP, ESPRESSO_SHOT, WHIPPED_CREAM],
        )?;
        world.rules.add_exclusion_set(&drink, &[MILK, HALF_AND_HALF])?;
    }

    world.cookbook.add_option_recipe(
        THE_WORKS,
        "the works",
        &CONE.to_string(),
        vec![RecipeOption::new(SPRINKLES), RecipeOption::new(WHIPPED_CREAM), RecipeOption::new(CARAMEL_SYRUP)],
    )?;

    Ok(world)
}

/// Key for a demo product with the given attributes; panics on an unknown pid.
#[cfg(test)]
pub(crate) fn key(pid: Pid, attributes: &[Aid]) -> super::attributes::Key {
    menu().ok().and_then(|w| w.key_for(pid, attributes)).unwrap_or_else(|| panic!("no key for {pid}"))
}

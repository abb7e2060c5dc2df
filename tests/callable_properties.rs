//! Property tests for the callable matchers.

use proptest::prelude::*;
use testkit_reflect::prelude::*;

fn type_pool(i: usize) -> TypeRef {
    match i % 4 {
        0 => TypeRef::of::<u8>(),
        1 => TypeRef::of::<u32>(),
        2 => TypeRef::of::<String>(),
        _ => TypeRef::of::<Option<bool>>(),
    }
}

fn visibility() -> impl Strategy<Value = Visibility> {
    prop::sample::select(Visibility::ALL.to_vec())
}

prop_compose! {
    fn descriptor()(
        visibility in visibility(),
        flags in any::<(bool, bool, bool, bool)>(),
        receiver in any::<bool>(),
        params in prop::collection::vec(("[a-z][a-z0-9_]{0,6}", 0usize..4), 0..5),
    ) -> CallableDescriptor {
        let (is_final, is_open, is_abstract, is_suspend) = flags;
        let mut builder = CallableDescriptor::builder("member")
            .owner("props::Owner")
            .visibility(visibility)
            .is_final(is_final)
            .is_open(is_open)
            .is_abstract(is_abstract)
            .is_suspend(is_suspend);
        if receiver {
            builder = builder.receiver(TypeRef::named("props::Owner"));
        }
        for (name, ty) in params {
            builder = builder.parameter(name, type_pool(ty));
        }
        builder.build()
    }
}

fn has_receiver(d: &CallableDescriptor) -> bool {
    d.parameters()
        .first()
        .is_some_and(|p| p.kind() == ParameterKind::Instance)
}

fn own_names(d: &CallableDescriptor) -> Vec<String> {
    d.value_parameters()
        .iter()
        .map(|p| p.name().unwrap_or_default().to_string())
        .collect()
}

fn own_types(d: &CallableDescriptor) -> Vec<TypeRef> {
    d.value_parameters().iter().map(|p| p.ty().clone()).collect()
}

proptest! {
    #[test]
    fn visibility_matches_exactly(d in descriptor(), v in visibility()) {
        prop_assert_eq!(have_visibility(v).matches(&d), d.visibility() == v);
    }

    #[test]
    fn modifier_matchers_read_their_flag(d in descriptor()) {
        prop_assert_eq!(be_final().matches(&d), d.is_final());
        prop_assert_eq!(be_open().matches(&d), d.is_open());
        prop_assert_eq!(be_abstract().matches(&d), d.is_abstract());
        prop_assert_eq!(be_suspendable().matches(&d), d.is_suspend());
    }

    #[test]
    fn wrong_length_never_passes(
        d in descriptor(),
        names in prop::collection::vec("[a-z]{1,4}", 0..6),
    ) {
        prop_assume!(d.parameters().len() != names.len() + 1);
        let types: Vec<_> = (0..names.len()).map(type_pool).collect();
        prop_assert!(!have_parameters_with_name(names).matches(&d));
        prop_assert!(!accept_parameters_of_type(types).matches(&d));
    }

    #[test]
    fn own_shape_passes_only_with_receiver(d in descriptor()) {
        prop_assert_eq!(have_parameters_with_name(own_names(&d)).matches(&d), has_receiver(&d));
        prop_assert_eq!(accept_parameters_of_type(own_types(&d)).matches(&d), has_receiver(&d));
    }

    #[test]
    fn receiverless_trailing_parameters_never_pass(d in descriptor()) {
        prop_assume!(!has_receiver(&d) && !d.parameters().is_empty());
        let names = own_names(&d)[1..].to_vec();
        let types = own_types(&d)[1..].to_vec();
        prop_assert!(!have_parameters_with_name(names).matches(&d));
        prop_assert!(!accept_parameters_of_type(types).matches(&d));
    }

    #[test]
    fn one_mismatch_flips_the_verdict(d in descriptor(), pick in any::<prop::sample::Index>()) {
        prop_assume!(has_receiver(&d) && !d.value_parameters().is_empty());

        let mut names = own_names(&d);
        let i = pick.index(names.len());
        names[i].push_str("_renamed");
        prop_assert!(!have_parameters_with_name(names).matches(&d));

        let mut types = own_types(&d);
        types[i] = TypeRef::named("props::Unrelated");
        prop_assert!(!accept_parameters_of_type(types).matches(&d));
    }

    #[test]
    fn evaluation_is_pure(d in descriptor(), v in visibility()) {
        let by_name = have_parameters_with_name(own_names(&d));
        prop_assert_eq!(by_name.test(&d), by_name.test(&d));

        let by_type = accept_parameters_of_type(own_types(&d));
        prop_assert_eq!(by_type.test(&d), by_type.test(&d));

        let by_visibility = have_visibility(v);
        prop_assert_eq!(by_visibility.test(&d), by_visibility.test(&d));
    }

    #[test]
    fn both_messages_are_always_present(d in descriptor(), v in visibility()) {
        let results = [
            have_visibility(v).test(&d),
            be_final().test(&d),
            be_suspendable().test(&d),
            have_parameters_with_name(own_names(&d)).test(&d),
            accept_parameters_of_type(own_types(&d)).test(&d),
        ];
        for r in results {
            prop_assert!(r.failure_message().starts_with("Member "));
            prop_assert!(r.failure_message().contains(" should "));
            prop_assert!(r.negated_failure_message().contains(" should not "));
        }
    }

    #[test]
    fn check_and_check_not_disagree(d in descriptor()) {
        prop_assert_ne!(check(&d, be_open()).is_ok(), check_not(&d, be_open()).is_ok());
    }
}

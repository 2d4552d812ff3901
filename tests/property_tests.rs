use proptest::prelude::*;
use tonic::metadata::MetadataMap;
use tonic::{Code, Request};
use user_directory::proto::user_service_server::UserService;
use user_directory::proto::{self, CreateUserRequest, GetUserRequest, GreetUserRequest};
use user_directory::server::greeting::title_case;
use user_directory::{
    AuthInterceptor, DEFAULT_TOKEN, DirectoryService, Error, TOKEN_METADATA_KEY, UserRegistry,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Runtime should build")
}

fn create_request(username: &str, role: &str) -> Request<CreateUserRequest> {
    Request::new(CreateUserRequest {
        user: Some(proto::User {
            username: username.to_string(),
            role: role.to_string(),
        }),
    })
}

fn get_request(username: &str) -> Request<GetUserRequest> {
    Request::new(GetUserRequest {
        username: username.to_string(),
    })
}

proptest! {
    #[test]
    fn created_user_round_trips(username in "[a-zA-Z0-9_.-]{1,32}", role in "[a-z ]{1,24}") {
        let service = DirectoryService::new(UserRegistry::new());
        let fetched = runtime().block_on(async {
            service.create_user(create_request(&username, &role)).await?;
            service.get_user(get_request(&username)).await
        });

        let fetched = fetched.expect("Stored user should be retrievable").into_inner();
        prop_assert_eq!(fetched.username, username);
        prop_assert_eq!(fetched.role, role);
    }

    #[test]
    fn last_write_wins(username in "[a-z]{1,16}", first in "[a-z]{1,16}", second in "[a-z]{1,16}") {
        let service = DirectoryService::new(UserRegistry::new());
        let fetched = runtime().block_on(async {
            service.create_user(create_request(&username, &first)).await?;
            service.create_user(create_request(&username, &second)).await?;
            service.get_user(get_request(&username)).await
        });

        prop_assert_eq!(fetched.expect("User should exist").into_inner().role, second);
    }

    #[test]
    fn empty_fields_never_reach_the_registry(
        (name, role) in prop_oneof![("", "[a-z]{0,8}"), ("[a-z]{0,8}", "")]
    ) {
        let service = DirectoryService::new(UserRegistry::new());
        let (result, stored) = runtime().block_on(async {
            let result = service.create_user(create_request(&name, &role)).await;
            (result, service.registry().len().await)
        });

        let status = result.expect_err("Empty fields must be rejected");
        prop_assert_eq!(status.code(), Code::InvalidArgument);
        prop_assert_eq!(stored, 0);
    }

    #[test]
    fn greeting_embeds_user_and_role(username in "[a-z]{1,12}", role in "[a-z]{1,12}", greeting in "[a-z]{1,12}( [a-z]{1,12}){0,3}") {
        let service = DirectoryService::new(UserRegistry::new());
        let response = runtime().block_on(async {
            service.create_user(create_request(&username, &role)).await?;
            service
                .greet_user(Request::new(GreetUserRequest {
                    username: username.clone(),
                    greeting: greeting.clone(),
                }))
                .await
        });

        let text = response.expect("Greeting should succeed").into_inner().greeting;
        let expected = format!("{}, {}! You are a great {}!", title_case(&greeting), username, role);
        prop_assert_eq!(text, expected);
    }

    #[test]
    fn title_case_only_touches_word_starts(text in "[a-zA-Z0-9 ,.'_-]{0,48}") {
        let titled = title_case(&text);
        prop_assert_eq!(titled.chars().count(), text.chars().count());

        let mut prev = ' ';
        for (original, out) in text.chars().zip(titled.chars()) {
            let starts_word = !(prev.is_ascii_alphanumeric() || prev == '_');
            if starts_word {
                prop_assert_eq!(out, original.to_ascii_uppercase());
            } else {
                prop_assert_eq!(out, original);
            }
            prev = original;
        }
    }

    #[test]
    fn any_other_token_is_invalid(token in "[ -~]{0,32}") {
        prop_assume!(token != DEFAULT_TOKEN);

        let gate = AuthInterceptor::new(DEFAULT_TOKEN);
        let mut metadata = MetadataMap::new();
        metadata.insert(TOKEN_METADATA_KEY, token.parse().expect("Visible ASCII is valid metadata"));

        prop_assert_eq!(gate.authorize(&metadata), Err(Error::InvalidToken));
    }
}

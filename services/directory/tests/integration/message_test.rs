use workforce_directory::error::DirectoryError;
use workforce_directory::usecase::message::{
    DeleteMessageUseCase, InboxUseCase, OpenMessageUseCase, SendMessageInput, SendMessageUseCase,
    SentMessagesUseCase,
};
use workforce_domain::id::UserId;

use crate::helpers::InMemoryDirectory;

fn send_uc(store: &InMemoryDirectory) -> SendMessageUseCase<InMemoryDirectory, InMemoryDirectory> {
    SendMessageUseCase {
        messages: store.clone(),
        users: store.clone(),
    }
}

fn hello(recipient_id: UserId) -> SendMessageInput {
    SendMessageInput {
        recipient_id,
        subject: "Hello".into(),
        body: "Lunch tomorrow?".into(),
    }
}

#[tokio::test]
async fn should_deliver_unread_message_to_inbox() {
    let store = InMemoryDirectory::new();
    let bob = store.seed_member("bob");
    let carol = store.seed_member("carol");

    let sent = send_uc(&store).execute(&bob, hello(carol.id)).await.unwrap();
    assert_eq!(sent.sender_id, bob.id);
    assert!(!sent.read);

    let inbox = InboxUseCase {
        messages: store.clone(),
    }
    .execute(&carol)
    .await
    .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, sent.id);

    let outbox = SentMessagesUseCase {
        messages: store.clone(),
    }
    .execute(&bob)
    .await
    .unwrap();
    assert_eq!(outbox.len(), 1);
    assert!(
        InboxUseCase {
            messages: store.clone(),
        }
        .execute(&bob)
        .await
        .unwrap()
        .is_empty()
    );
}

#[tokio::test]
async fn should_reject_unknown_recipient() {
    let store = InMemoryDirectory::new();
    let bob = store.seed_member("bob");

    let result = send_uc(&store).execute(&bob, hello(UserId(321))).await;

    assert!(matches!(result, Err(DirectoryError::UserNotFound)));
    assert!(store.read(|t| t.messages.is_empty()));
}

#[tokio::test]
async fn should_forbid_pending_user_sending() {
    let store = InMemoryDirectory::new();
    let pending = store.seed_user("bob", false, false);
    let carol = store.seed_member("carol");

    let result = send_uc(&store).execute(&pending, hello(carol.id)).await;

    assert!(matches!(result, Err(DirectoryError::Forbidden)));
}

#[tokio::test]
async fn should_mark_read_only_when_recipient_opens() {
    let store = InMemoryDirectory::new();
    let bob = store.seed_member("bob");
    let carol = store.seed_member("carol");
    let sent = send_uc(&store).execute(&bob, hello(carol.id)).await.unwrap();
    let open = OpenMessageUseCase {
        messages: store.clone(),
    };

    let as_sender = open.execute(&bob, sent.id).await.unwrap();
    assert!(!as_sender.read);
    assert!(!store.read(|t| t.messages[0].read));

    let as_recipient = open.execute(&carol, sent.id).await.unwrap();
    assert!(as_recipient.read);
    assert!(store.read(|t| t.messages[0].read));
}

#[tokio::test]
async fn should_hide_message_from_third_party() {
    let store = InMemoryDirectory::new();
    let bob = store.seed_member("bob");
    let carol = store.seed_member("carol");
    let eve = store.seed_member("eve");
    let sent = send_uc(&store).execute(&bob, hello(carol.id)).await.unwrap();

    let opened = OpenMessageUseCase {
        messages: store.clone(),
    }
    .execute(&eve, sent.id)
    .await;
    let deleted = DeleteMessageUseCase {
        messages: store.clone(),
    }
    .execute(&eve, sent.id)
    .await;

    assert!(matches!(opened, Err(DirectoryError::Forbidden)));
    assert!(matches!(deleted, Err(DirectoryError::Forbidden)));
    assert_eq!(store.read(|t| t.messages.len()), 1);
}

#[tokio::test]
async fn should_delete_message_for_recipient() {
    let store = InMemoryDirectory::new();
    let bob = store.seed_member("bob");
    let carol = store.seed_member("carol");
    let sent = send_uc(&store).execute(&bob, hello(carol.id)).await.unwrap();
    let delete = DeleteMessageUseCase {
        messages: store.clone(),
    };

    delete.execute(&carol, sent.id).await.unwrap();

    assert!(store.read(|t| t.messages.is_empty()));
    assert!(matches!(
        delete.execute(&carol, sent.id).await,
        Err(DirectoryError::MessageNotFound)
    ));
}
